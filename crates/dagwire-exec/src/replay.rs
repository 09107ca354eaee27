//! Deterministic replay & provenance helpers.
//!
//! Hashes are computed from serde-JSON of the logical DAG and of the backend
//! artifact. Translating the same DAG with the same backend settings yields
//! the same digests.

use std::collections::BTreeMap;

use dagwire_core::dag::{Dag, LogicalOp};
use dagwire_core::hash::{hash_serde, Hash256};
use dagwire_core::types::RowBatch;

use crate::stream::StreamProgram;
use crate::ExecError;

pub fn hash_dag(dag: &Dag<LogicalOp>) -> Result<Hash256, ExecError> {
    hash_serde(dag).map_err(|e| ExecError::Hash(e.to_string()))
}

/// Fold the stage list and the sink list into one digest.
pub fn hash_program(program: &StreamProgram) -> Result<Hash256, ExecError> {
    let a = hash_serde(&program.stages).map_err(|e| ExecError::Hash(e.to_string()))?;
    let b = hash_serde(&program.sinks).map_err(|e| ExecError::Hash(e.to_string()))?;
    Ok(a.xor(b))
}

/// Digest of batch sink contents (ordered by destination).
pub fn hash_outputs(sinks: &BTreeMap<String, RowBatch>) -> Result<Hash256, ExecError> {
    hash_serde(sinks).map_err(|e| ExecError::Hash(e.to_string()))
}
