//! Wiring errors raised by the registry and the driver.
//!
//! Every variant indicates a broken invariant upstream (bad visit order,
//! double translation, wrong arity assumption). None is retryable.

use dagwire_core::dag::Node;
use dagwire_core::id::OpId;
use thiserror::Error;

/// Result type local to dagwire-translate.
pub type Result<T> = std::result::Result<T, BindingError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("operator {op} is not part of the DAG")]
    UnknownOperator { op: OpId },

    #[error("no output exists for operator '{name}' ({op})")]
    MissingOutput { op: OpId, name: String },

    #[error("output missing for operator '{parent_name}' ({parent}), an input of '{name}' ({op})")]
    MissingInput {
        op: OpId,
        name: String,
        parent: OpId,
        parent_name: String,
    },

    #[error("operator '{name}' ({op}) output already processed")]
    DuplicateBinding { op: OpId, name: String },

    #[error("operator '{name}' ({op}) expects exactly one input, found {actual}")]
    Cardinality {
        op: OpId,
        name: String,
        actual: usize,
    },
}

/// Coarse classification of a `BindingError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingErrorKind {
    UnknownOperator,
    MissingBinding,
    DuplicateBinding,
    Cardinality,
}

impl BindingError {
    pub fn kind(&self) -> BindingErrorKind {
        match self {
            BindingError::UnknownOperator { .. } => BindingErrorKind::UnknownOperator,
            BindingError::MissingOutput { .. } | BindingError::MissingInput { .. } => {
                BindingErrorKind::MissingBinding
            }
            BindingError::DuplicateBinding { .. } => BindingErrorKind::DuplicateBinding,
            BindingError::Cardinality { .. } => BindingErrorKind::Cardinality,
        }
    }

    /// The operator the failing call was made for.
    pub fn op(&self) -> OpId {
        match self {
            BindingError::UnknownOperator { op }
            | BindingError::MissingOutput { op, .. }
            | BindingError::MissingInput { op, .. }
            | BindingError::DuplicateBinding { op, .. }
            | BindingError::Cardinality { op, .. } => *op,
        }
    }
}

/// Error surfaced by a translation pass.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("translating '{name}' ({op}) failed: {message}")]
    Backend {
        op: OpId,
        name: String,
        message: String,
    },
}

impl TranslateError {
    /// Backend failure attributed to `node`.
    pub fn backend<T>(node: &Node<T>, message: impl Into<String>) -> Self {
        TranslateError::Backend {
            op: node.id(),
            name: node.name().to_string(),
            message: message.into(),
        }
    }

    pub fn binding_kind(&self) -> Option<BindingErrorKind> {
        match self {
            TranslateError::Binding(e) => Some(e.kind()),
            TranslateError::Backend { .. } => None,
        }
    }

    pub fn op(&self) -> OpId {
        match self {
            TranslateError::Binding(e) => e.op(),
            TranslateError::Backend { op, .. } => *op,
        }
    }
}
