//! Translation driver: walk a DAG, translate each operator, bind its output.
//!
//! The driver owns no ordering logic of its own. `translate_dag` follows the
//! DAG's insertion order (topological by construction); `translate_in_order`
//! follows whatever order the caller supplies and lets the registry reject
//! visits that come before their inputs. The first error aborts the pass.

use dagwire_core::dag::{Dag, Node};
use dagwire_core::id::OpId;

use crate::context::ExecutorContext;
use crate::error::{BindingError, TranslateError};
use crate::metrics;

/// Backend-specific translation of one operator.
///
/// Implementations pull inputs from `ctx` (usually `single_input` or
/// `inputs`) and return the operator's output; the driver binds it.
/// They must not call `ctx.set_output` for `node` themselves.
pub trait Translator<T> {
    type Env;
    type Output: Clone;

    /// Backend name for logs and manifests.
    fn name(&self) -> &'static str;

    fn translate(
        &mut self,
        ctx: &mut ExecutorContext<'_, Self::Env, Self::Output, T>,
        node: &Node<T>,
    ) -> Result<Self::Output, TranslateError>;
}

/// Translate every operator of `dag` in its topological order.
pub fn translate_dag<'a, T, X>(
    dag: &'a Dag<T>,
    env: X::Env,
    translator: &mut X,
) -> Result<ExecutorContext<'a, X::Env, X::Output, T>, TranslateError>
where
    X: Translator<T>,
{
    let order = dag.topological_order();
    translate_in_order(dag, &order, env, translator)
}

/// Translate the operators named by `order`, in that order.
pub fn translate_in_order<'a, T, X>(
    dag: &'a Dag<T>,
    order: &[OpId],
    env: X::Env,
    translator: &mut X,
) -> Result<ExecutorContext<'a, X::Env, X::Output, T>, TranslateError>
where
    X: Translator<T>,
{
    let mut ctx = ExecutorContext::new(env, dag);
    metrics::pass_started(translator.name(), order.len());

    if let Err(e) = run_pass(&mut ctx, order, translator) {
        metrics::pass_failed(translator.name(), &e);
        return Err(e);
    }

    metrics::pass_finished(translator.name(), ctx.len());
    Ok(ctx)
}

fn run_pass<T, X>(
    ctx: &mut ExecutorContext<'_, X::Env, X::Output, T>,
    order: &[OpId],
    translator: &mut X,
) -> Result<(), TranslateError>
where
    X: Translator<T>,
{
    let dag = ctx.dag();
    for &op in order {
        let node = dag.node(op).ok_or(BindingError::UnknownOperator { op })?;
        let output = translator.translate(ctx, node)?;
        ctx.set_output(op, output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindingErrorKind;

    /// Concatenates parent outputs; records visit order in the environment.
    struct Concat;

    impl Translator<char> for Concat {
        type Env = Vec<OpId>;
        type Output = String;

        fn name(&self) -> &'static str {
            "concat"
        }

        fn translate(
            &mut self,
            ctx: &mut ExecutorContext<'_, Vec<OpId>, String, char>,
            node: &Node<char>,
        ) -> Result<String, TranslateError> {
            let mut out: String = ctx.inputs(node.id())?.concat();
            out.push(*node.op());
            ctx.environment_mut().push(node.id());
            Ok(out)
        }
    }

    fn diamond() -> Dag<char> {
        let mut b = Dag::builder();
        let a = b.add("a", 'a', &[]).unwrap();
        let l = b.add("l", 'l', &[a]).unwrap();
        let r = b.add("r", 'r', &[a]).unwrap();
        b.add("j", 'j', &[l, r]).unwrap();
        b.build()
    }

    #[test]
    fn topological_pass_binds_everything() {
        let dag = diamond();
        let ctx = translate_dag(&dag, Vec::new(), &mut Concat).unwrap();
        assert_eq!(ctx.len(), 4);
        assert_eq!(ctx.output(OpId::new(3)).unwrap(), "alarj");
        assert_eq!(ctx.environment(), &dag.topological_order());
    }

    #[test]
    fn out_of_order_visit_fails_fast() {
        let dag = diamond();
        let order = [OpId::new(0), OpId::new(3), OpId::new(1), OpId::new(2)];
        let err = translate_in_order(&dag, &order, Vec::new(), &mut Concat).unwrap_err();
        assert_eq!(err.binding_kind(), Some(BindingErrorKind::MissingBinding));
        assert_eq!(err.op(), OpId::new(3));
    }

    #[test]
    fn double_visit_is_a_duplicate_binding() {
        let dag = diamond();
        let order = [OpId::new(0), OpId::new(0)];
        let err = translate_in_order(&dag, &order, Vec::new(), &mut Concat).unwrap_err();
        assert_eq!(err.binding_kind(), Some(BindingErrorKind::DuplicateBinding));
    }

    #[test]
    fn backend_errors_name_the_operator() {
        struct Refuse;
        impl Translator<char> for Refuse {
            type Env = ();
            type Output = ();
            fn name(&self) -> &'static str {
                "refuse"
            }
            fn translate(
                &mut self,
                _ctx: &mut ExecutorContext<'_, (), (), char>,
                node: &Node<char>,
            ) -> Result<(), TranslateError> {
                Err(TranslateError::backend(node, "not supported"))
            }
        }

        let dag = diamond();
        let err = translate_dag(&dag, (), &mut Refuse).unwrap_err();
        assert_eq!(err.binding_kind(), None);
        assert_eq!(err.to_string(), "translating 'a' (OpId(0)) failed: not supported");
    }
}
