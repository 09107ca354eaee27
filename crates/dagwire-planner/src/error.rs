use dagwire_core::dag::Arity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid pipeline yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("pipeline has no steps")]
    Empty,

    #[error("duplicate step name '{0}'")]
    DuplicateStep(String),

    #[error("step '{step}' references unknown input '{input}' (inputs must be declared above)")]
    UnknownInput { step: String, input: String },

    #[error("step '{step}' has no input; only scan may start a pipeline")]
    MissingInput { step: String },

    #[error("step '{step}' ({op}) expects {expected} inputs, got {actual}")]
    Arity {
        step: String,
        op: &'static str,
        expected: Arity,
        actual: usize,
    },

    #[error(transparent)]
    Core(#[from] dagwire_core::Error),
}
