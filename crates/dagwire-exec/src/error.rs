use thiserror::Error;

use dagwire_planner::PlanError;
use dagwire_translate::TranslateError;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Core(#[from] dagwire_core::Error),

    #[error("invalid plan: {0}")]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("hashing error: {0}")]
    Hash(String),
}
