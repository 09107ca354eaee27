//! dagwire: translate logical dataflow DAGs onto batch or stream backends.
//!
//! Facade over the workspace crates:
//! - `dagwire_core`: ids, the operator DAG, schemas, row batches, config, manifests.
//! - `translate`: the binding registry (`ExecutorContext`) and the driver.
//! - `planner`: YAML pipelines into `Dag<LogicalOp>`.
//! - `exec`: the batch and stream backends and the `Engine`.

pub use dagwire_core;
pub use dagwire_exec as exec;
pub use dagwire_planner as planner;
pub use dagwire_translate as translate;

pub use dagwire_core::prelude::*;
pub use dagwire_exec::{BatchRun, Engine, StreamRun};
pub use dagwire_planner::parse_yaml_pipeline;
pub use dagwire_translate::{
    translate_dag, translate_in_order, BindingError, BindingErrorKind, ExecutorContext,
    TranslateError, Translator,
};
