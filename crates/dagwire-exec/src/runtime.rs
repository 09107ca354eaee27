//! Runtime: run one translation pass over a logical DAG and emit a manifest.
//!
//! Behavior:
//! - Checks operator arity up front, so translators may rely on
//!   `single_input` for unary operators.
//! - Drives the chosen backend through `dagwire_translate::translate_dag`.
//! - Emits a `TranslationManifest` with stable DAG/program hashes.

use std::collections::{BTreeMap, HashMap};
use std::time::{SystemTime, UNIX_EPOCH};

use dagwire_core::config::{BackendKind, TranslateConfig};
use dagwire_core::dag::{Dag, LogicalOp};
use dagwire_core::manifest::TranslationManifest;
use dagwire_core::types::RowBatch;
use dagwire_planner::validate_arity;
use dagwire_translate::translate_dag;

use crate::batch::{BatchEnv, BatchTranslator};
use crate::replay::{hash_dag, hash_outputs, hash_program};
use crate::stream::{StreamEnv, StreamProgram, StreamTranslator};
use crate::ExecError;

/// Result of a batch pass: materialized sinks by destination.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub sinks: BTreeMap<String, RowBatch>,
    pub manifest: TranslationManifest,
}

/// Result of a stream lowering pass.
#[derive(Debug, Clone)]
pub struct StreamRun {
    pub program: StreamProgram,
    pub manifest: TranslationManifest,
}

/// Engine owns the translation config; each call is an independent pass.
#[derive(Debug, Clone)]
pub struct Engine {
    cfg: TranslateConfig,
}

impl Engine {
    pub fn new(cfg: TranslateConfig) -> Result<Self, ExecError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &TranslateConfig {
        &self.cfg
    }

    pub fn backend(&self) -> BackendKind {
        self.cfg.backend
    }

    /// Evaluate `dag` against in-memory `sources` (keyed by source name).
    pub fn run_batch(
        &self,
        dag: &Dag<LogicalOp>,
        sources: HashMap<String, RowBatch>,
    ) -> Result<BatchRun, ExecError> {
        validate_arity(dag)?;
        let dag_hash = hash_dag(dag)?;
        let manifest = TranslationManifest::new(dag_hash, BackendKind::Batch.as_str(), now_millis());

        let mut env = BatchEnv::new().with_max_source_rows(self.cfg.max_source_rows);
        for (name, batch) in sources {
            env.register_source(name, batch);
        }

        let mut translator = BatchTranslator::new();
        let bound = translate_dag(dag, env, &mut translator)?.len();

        let sinks: BTreeMap<String, RowBatch> = translator
            .into_sinks()
            .into_iter()
            .map(|(dest, data)| (dest, (*data).clone()))
            .collect();
        let outputs_hash = hash_outputs(&sinks)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(bound, sinks = sinks.len(), "batch pass complete");

        Ok(BatchRun {
            sinks,
            manifest: manifest.finish(now_millis(), bound, Some(outputs_hash)),
        })
    }

    /// Lower `dag` into a stream stage graph.
    pub fn lower_stream(&self, dag: &Dag<LogicalOp>) -> Result<StreamRun, ExecError> {
        validate_arity(dag)?;
        let dag_hash = hash_dag(dag)?;
        let manifest =
            TranslationManifest::new(dag_hash, BackendKind::Stream.as_str(), now_millis());

        let env = StreamEnv::new(self.cfg.job_name.clone(), self.cfg.parallelism);
        let mut translator = StreamTranslator::new();
        let ctx = translate_dag(dag, env, &mut translator)?;
        let bound = ctx.len();
        let (env, _) = ctx.into_parts();

        let program = translator.finish(&env);
        let program_hash = hash_program(&program)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(bound, stages = program.stages.len(), "stream lowering complete");

        Ok(StreamRun {
            program,
            manifest: manifest.finish(now_millis(), bound, Some(program_hash)),
        })
    }
}

// --- helpers ---

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
