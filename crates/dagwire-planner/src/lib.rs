#![forbid(unsafe_code)]
//! dagwire-planner: YAML pipelines → `Dag<LogicalOp>`.
//!
//! Design:
//! - Steps are added to a `DagBuilder` in document order, so a step may only
//!   reference steps declared above it and the resulting DAG is already in
//!   topological order.
//! - A step without `inputs` consumes the step right above it.
//! - Arity is checked here, before any backend sees the DAG; translators can
//!   then rely on `single_input` for unary operators.

pub mod dsl;
pub mod error;
pub mod validate;

pub use dsl::yaml::{parse_yaml_pipeline, ParsedPipeline, PipelineConfig};
pub use error::PlanError;
pub use validate::validate_arity;
