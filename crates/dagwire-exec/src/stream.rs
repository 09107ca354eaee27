//! Stream backend: lowers the logical DAG into a stage graph.
//!
//! Nothing is executed. Each operator becomes one `Stage` carrying its
//! operator key, upstream stage ids, parallelism, and a JSON config payload
//! from which a runtime can instantiate the operator.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use dagwire_core::dag::{LogicalOp, Node};
use dagwire_core::id::{OpId, StageId};
use dagwire_translate::{ExecutorContext, TranslateError, Translator};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    pub id: StageId,
    pub op: OpId,
    pub name: String,
    pub key: &'static str,
    pub parallelism: usize,
    pub inputs: Vec<StageId>,
    pub config: serde_json::Value,
}

/// Output handle of the stream backend.
pub type StreamHandle = Arc<Stage>;

/// Environment handle: job-level settings plus the stage id counter.
#[derive(Debug, Clone)]
pub struct StreamEnv {
    job_name: String,
    parallelism: usize,
    next_stage: u64,
}

impl StreamEnv {
    pub fn new(job_name: impl Into<String>, parallelism: usize) -> Self {
        Self {
            job_name: job_name.into(),
            parallelism: parallelism.max(1),
            next_stage: 0,
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    fn allocate_stage(&mut self) -> StageId {
        let id = StageId::new(self.next_stage);
        self.next_stage += 1;
        id
    }
}

/// Lowered job: stages in creation order (upstream first) and the sink stages.
#[derive(Debug, Clone, Serialize)]
pub struct StreamProgram {
    pub job_name: String,
    pub stages: Vec<Stage>,
    pub sinks: Vec<StageId>,
}

impl StreamProgram {
    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }
}

type StreamContext<'a> = ExecutorContext<'a, StreamEnv, StreamHandle, LogicalOp>;

#[derive(Debug, Default)]
pub struct StreamTranslator {
    stages: Vec<Stage>,
}

impl StreamTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble the program once the pass has bound every operator.
    pub fn finish(self, env: &StreamEnv) -> StreamProgram {
        let sinks = self
            .stages
            .iter()
            .filter(|s| s.key == "sink")
            .map(|s| s.id)
            .collect();
        StreamProgram {
            job_name: env.job_name.clone(),
            stages: self.stages,
            sinks,
        }
    }
}

fn stage_config(op: &LogicalOp) -> serde_json::Value {
    match op {
        LogicalOp::Scan { source, schema } => json!({ "source": source, "schema": schema }),
        LogicalOp::Filter { expr } | LogicalOp::Map { expr } => json!({ "expr": expr }),
        LogicalOp::Project { columns } => json!({ "columns": columns }),
        LogicalOp::Union => json!({}),
        LogicalOp::Sink {
            destination,
            format,
        } => json!({ "destination": destination, "format": format }),
    }
}

impl Translator<LogicalOp> for StreamTranslator {
    type Env = StreamEnv;
    type Output = StreamHandle;

    fn name(&self) -> &'static str {
        "stream"
    }

    fn translate(
        &mut self,
        ctx: &mut StreamContext<'_>,
        node: &Node<LogicalOp>,
    ) -> Result<StreamHandle, TranslateError> {
        let op = node.op();
        let upstream = if op.is_unary() {
            vec![ctx.single_input(node.id())?]
        } else {
            ctx.inputs(node.id())?
        };

        // sinks write through a single task
        let parallelism = match op {
            LogicalOp::Sink { .. } => 1,
            _ => ctx.environment().parallelism,
        };

        let stage = Stage {
            id: ctx.environment_mut().allocate_stage(),
            op: node.id(),
            name: node.name().to_string(),
            key: op.key(),
            parallelism,
            inputs: upstream.iter().map(|s| s.id).collect(),
            config: stage_config(op),
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(stage = %stage.id, op = %stage.op, key = stage.key, inputs = stage.inputs.len(), "lowered stage");

        self.stages.push(stage.clone());
        Ok(Arc::new(stage))
    }
}
