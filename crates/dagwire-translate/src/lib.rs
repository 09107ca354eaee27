#![forbid(unsafe_code)]
//! dagwire-translate: the binding registry used while translating an operator
//! DAG into a backend execution graph.
//!
//! A translation pass visits operators in topological order. For each one the
//! driver asks the registry (`ExecutorContext`) for the outputs of the
//! operator's parents, lets a backend-specific `Translator` build the
//! operator's own output, and registers that output exactly once.
//!
//! The registry is generic over the environment handle `E` and the output
//! handle `D`, so the same wiring rules serve bounded and unbounded backends.
//! It is single-threaded and does no internal locking.

pub mod context;
pub mod driver;
pub mod error;
mod metrics;

pub use context::ExecutorContext;
pub use driver::{translate_dag, translate_in_order, Translator};
pub use error::{BindingError, BindingErrorKind, Result, TranslateError};
