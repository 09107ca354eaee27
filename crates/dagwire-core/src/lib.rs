#![forbid(unsafe_code)]
//! dagwire-core: shared vocabulary for translating operator DAGs into backend
//! execution graphs.
//!
//! This crate owns:
//!   * strongly-typed ids (`OpId`, `StageId`)
//!   * the immutable operator DAG (`Dag`, `Node`, `DagBuilder`)
//!   * the logical operator set understood by the bundled backends
//!   * lightweight schema/value types, config, hashing, and run manifests
//!
//! No translation logic lives here; see `dagwire-translate`.

pub mod config;
pub mod dag;
pub mod error;
pub mod hash;
pub mod id;
pub mod manifest;
pub mod prelude;
pub mod schema;
pub mod types;

pub use error::{Error, Result};

/// Version string recorded in manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
