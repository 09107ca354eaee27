//! Convenient re-exports for downstream crates.

pub use crate::config::{BackendKind, TranslateConfig};
pub use crate::dag::{Arity, Dag, DagBuilder, LogicalOp, Node};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::id::{OpId, StageId};
pub use crate::manifest::{ManifestId, TranslationManifest};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Column, RowBatch, Scalar};
