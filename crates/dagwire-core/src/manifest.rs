//! Translation manifest for audit/replay.
//!
//! The engine emits one manifest per successful translation pass. Identical
//! DAGs translated by the same backend produce identical `dag_hash` and
//! `program_hash` values.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationManifest {
    pub id: ManifestId,

    /// Stable hash of the logical DAG that was translated.
    pub dag_hash: Hash256,

    /// Stable hash of the backend artifact, when the backend produces one.
    pub program_hash: Option<Hash256>,

    /// Backend name ("batch", "stream", ...).
    pub backend: String,

    /// Engine version string for provenance.
    pub engine_version: String,

    /// Number of operators bound during the pass.
    pub operators_bound: usize,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl TranslationManifest {
    pub fn new(dag_hash: Hash256, backend: impl Into<String>, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            dag_hash,
            program_hash: None,
            backend: backend.into(),
            engine_version: crate::VERSION.to_string(),
            operators_bound: 0,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(
        mut self,
        finished_ms: u64,
        operators_bound: usize,
        program_hash: Option<Hash256>,
    ) -> Self {
        self.finished_ms = finished_ms;
        self.operators_bound = operators_bound;
        self.program_hash = program_hash;
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.finished_ms.saturating_sub(self.started_ms)
    }
}
