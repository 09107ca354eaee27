//! Structural checks on logical DAGs.

use dagwire_core::dag::{Dag, LogicalOp};

use crate::error::PlanError;

/// Every operator must have a parent count its kind accepts.
pub fn validate_arity(dag: &Dag<LogicalOp>) -> Result<(), PlanError> {
    for node in dag.nodes() {
        let arity = node.op().arity();
        let actual = node.parents().len();
        if !arity.accepts(actual) {
            return Err(PlanError::Arity {
                step: node.name().to_string(),
                op: node.op().key(),
                expected: arity,
                actual,
            });
        }
    }
    Ok(())
}
