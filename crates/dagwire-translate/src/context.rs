//! `ExecutorContext`: write-once mapping from operator to translated output.
//!
//! Invariants:
//! - An operator is bound at most once; a second `set_output` fails and the
//!   first binding stays in place.
//! - Reads (`inputs`, `single_input`, `output`) succeed only for operators that
//!   are already bound.
//! - Bindings are keyed by `OpId`, never by operator payload, so structurally
//!   identical operators keep independent outputs.
//! - The mapping only grows for the lifetime of the context.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use dagwire_core::dag::{Dag, LogicalOp, Node};
use dagwire_core::id::OpId;

use crate::error::{BindingError, Result};
use crate::metrics;

/// Binding registry for one translation pass.
///
/// `E` is the backend environment handle, `D` the per-operator output handle
/// (typically something cheap to clone such as an `Arc`), and `T` the DAG's
/// operator payload.
#[derive(Debug)]
pub struct ExecutorContext<'a, E, D, T = LogicalOp> {
    env: E,
    dag: &'a Dag<T>,
    outputs: HashMap<OpId, D>,
}

impl<'a, E, D, T> ExecutorContext<'a, E, D, T> {
    pub fn new(env: E, dag: &'a Dag<T>) -> Self {
        Self {
            env,
            dag,
            outputs: HashMap::with_capacity(dag.len()),
        }
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Backends whose environment accumulates state (registered sources,
    /// stage counters) mutate it through here.
    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn dag(&self) -> &'a Dag<T> {
        self.dag
    }

    pub fn is_bound(&self, op: OpId) -> bool {
        self.outputs.contains_key(&op)
    }

    /// Number of bound operators.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Register the output of `op`.
    pub fn set_output(&mut self, op: OpId, output: D) -> Result<()> {
        let node = self.node(op)?;
        match self.outputs.entry(op) {
            Entry::Occupied(_) => Err(BindingError::DuplicateBinding {
                op,
                name: node.name().to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(output);
                metrics::bound(op, node.name(), self.outputs.len());
                Ok(())
            }
        }
    }

    /// Consume the context, keeping only the bindings.
    pub fn into_outputs(self) -> HashMap<OpId, D> {
        self.outputs
    }

    pub fn into_parts(self) -> (E, HashMap<OpId, D>) {
        (self.env, self.outputs)
    }

    fn node(&self, op: OpId) -> Result<&'a Node<T>> {
        self.dag
            .node(op)
            .ok_or(BindingError::UnknownOperator { op })
    }
}

impl<'a, E, D: Clone, T> ExecutorContext<'a, E, D, T> {
    /// Outputs of `op`'s parents, in the DAG's parent order.
    pub fn inputs(&self, op: OpId) -> Result<Vec<D>> {
        let node = self.node(op)?;
        node.parents()
            .iter()
            .map(|parent| {
                self.outputs
                    .get(parent)
                    .cloned()
                    .ok_or_else(|| BindingError::MissingInput {
                        op,
                        name: node.name().to_string(),
                        parent: *parent,
                        parent_name: self
                            .dag
                            .node(*parent)
                            .map(|p| p.name().to_string())
                            .unwrap_or_default(),
                    })
            })
            .collect()
    }

    /// The lone input of `op`.
    ///
    /// Only valid for operators the caller knows to be unary; the registry
    /// itself has no notion of arity beyond the parent count.
    pub fn single_input(&self, op: OpId) -> Result<D> {
        let mut inputs = self.inputs(op)?;
        match inputs.pop() {
            Some(only) if inputs.is_empty() => Ok(only),
            popped => Err(BindingError::Cardinality {
                op,
                name: self.node(op)?.name().to_string(),
                actual: inputs.len() + usize::from(popped.is_some()),
            }),
        }
    }

    /// The output already registered for `op`.
    pub fn output(&self, op: OpId) -> Result<D> {
        let node = self.node(op)?;
        self.outputs
            .get(&op)
            .cloned()
            .ok_or_else(|| BindingError::MissingOutput {
                op,
                name: node.name().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindingErrorKind;

    struct Chain {
        dag: Dag<&'static str>,
        a: OpId,
        b: OpId,
        c: OpId,
        d: OpId,
    }

    // a -> b -> c, a -> ... and d(b, c)
    fn chain() -> Chain {
        let mut builder = Dag::builder();
        let a = builder.add("A", "source", &[]).unwrap();
        let b = builder.add("B", "map", &[a]).unwrap();
        let c = builder.add("C", "map", &[b]).unwrap();
        let d = builder.add("D", "union", &[b, c]).unwrap();
        Chain {
            dag: builder.build(),
            a,
            b,
            c,
            d,
        }
    }

    #[test]
    fn linear_chain_scenario() {
        let g = chain();
        let mut ctx: ExecutorContext<'_, (), &str, &str> = ExecutorContext::new((), &g.dag);

        ctx.set_output(g.a, "a-out").unwrap();
        assert_eq!(ctx.single_input(g.b).unwrap(), "a-out");
        ctx.set_output(g.b, "b-out").unwrap();
        assert_eq!(ctx.single_input(g.c).unwrap(), "b-out");

        let err = ctx.set_output(g.a, "a-out-2").unwrap_err();
        assert_eq!(err.kind(), BindingErrorKind::DuplicateBinding);
        assert_eq!(ctx.output(g.a).unwrap(), "a-out");
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn fan_in_waits_for_every_parent() {
        let g = chain();
        let mut ctx: ExecutorContext<'_, (), String, &str> = ExecutorContext::new((), &g.dag);
        ctx.set_output(g.a, "a-out".into()).unwrap();
        ctx.set_output(g.b, "b-out".into()).unwrap();

        let err = ctx.inputs(g.d).unwrap_err();
        assert_eq!(err.kind(), BindingErrorKind::MissingBinding);
        match err {
            BindingError::MissingInput {
                parent, parent_name, ..
            } => {
                assert_eq!(parent, g.c);
                assert_eq!(parent_name, "C");
            }
            other => panic!("unexpected error: {other}"),
        }

        ctx.set_output(g.c, "c-out".into()).unwrap();
        assert_eq!(ctx.inputs(g.d).unwrap(), vec!["b-out", "c-out"]);
    }

    #[test]
    fn unbound_reads_fail() {
        let g = chain();
        let ctx: ExecutorContext<'_, (), u32, &str> = ExecutorContext::new((), &g.dag);
        assert_eq!(
            ctx.output(g.a).unwrap_err().kind(),
            BindingErrorKind::MissingBinding
        );
        assert_eq!(
            ctx.inputs(g.b).unwrap_err().kind(),
            BindingErrorKind::MissingBinding
        );
        // roots have no parents, so their input list is trivially ready
        assert!(ctx.inputs(g.a).unwrap().is_empty());
    }

    #[test]
    fn single_input_requires_exactly_one_parent() {
        let g = chain();
        let mut ctx: ExecutorContext<'_, (), u32, &str> = ExecutorContext::new((), &g.dag);
        for (op, v) in [(g.a, 1), (g.b, 2), (g.c, 3)] {
            ctx.set_output(op, v).unwrap();
        }

        let none = ctx.single_input(g.a).unwrap_err();
        assert_eq!(
            none,
            BindingError::Cardinality {
                op: g.a,
                name: "A".into(),
                actual: 0
            }
        );
        let two = ctx.single_input(g.d).unwrap_err();
        assert!(matches!(two, BindingError::Cardinality { actual: 2, .. }));
        assert_eq!(ctx.single_input(g.c).unwrap(), 2);
    }

    #[test]
    fn identical_operators_do_not_alias() {
        let mut builder = Dag::builder();
        let src = builder.add("src", "source", &[]).unwrap();
        let f1 = builder.add("filter", "x > 1", &[src]).unwrap();
        let f2 = builder.add("filter", "x > 1", &[src]).unwrap();
        let dag = builder.build();

        let mut ctx: ExecutorContext<'_, (), u8, &str> = ExecutorContext::new((), &dag);
        ctx.set_output(f1, 1).unwrap();
        assert!(!ctx.is_bound(f2));
        assert!(ctx.output(f2).is_err());
        ctx.set_output(f2, 2).unwrap();
        assert_eq!(ctx.output(f1).unwrap(), 1);
        assert_eq!(ctx.output(f2).unwrap(), 2);
    }

    #[test]
    fn foreign_ids_are_rejected() {
        let g = chain();
        let mut ctx: ExecutorContext<'_, (), u8, &str> = ExecutorContext::new((), &g.dag);
        let ghost = OpId::new(42);
        assert_eq!(
            ctx.set_output(ghost, 0).unwrap_err(),
            BindingError::UnknownOperator { op: ghost }
        );
        assert_eq!(
            ctx.output(ghost).unwrap_err().kind(),
            BindingErrorKind::UnknownOperator
        );
        assert!(ctx.is_empty());
    }

    #[test]
    fn into_outputs_keeps_every_binding() {
        let g = chain();
        let mut ctx: ExecutorContext<'_, (), &str, &str> = ExecutorContext::new((), &g.dag);
        ctx.set_output(g.a, "a-out").unwrap();
        ctx.set_output(g.b, "b-out").unwrap();
        assert!(ctx.set_output(g.a, "again").is_err());

        let outputs = ctx.into_outputs();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[&g.a], "a-out");
        assert_eq!(outputs[&g.b], "b-out");
        assert!(!outputs.contains_key(&g.c));
    }

    #[test]
    fn environment_is_shared_and_parts_come_back() {
        let g = chain();
        let mut ctx: ExecutorContext<'_, Vec<&str>, u8, &str> =
            ExecutorContext::new(vec!["boot"], &g.dag);
        ctx.environment_mut().push("a");
        ctx.set_output(g.a, 7).unwrap();
        assert_eq!(ctx.environment(), &vec!["boot", "a"]);
        assert_eq!(ctx.dag().len(), 4);

        let (env, outputs) = ctx.into_parts();
        assert_eq!(env.len(), 2);
        assert_eq!(outputs.get(&g.a), Some(&7));
    }
}
