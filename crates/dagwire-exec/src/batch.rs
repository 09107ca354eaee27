//! Bounded batch backend.
//!
//! Every operator is evaluated eagerly while the driver walks the DAG, so the
//! output handle of an operator is the finished `RowBatch` behind an `Arc`.
//! Children share their parent's dataset instead of copying it.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use dagwire_core::dag::{LogicalOp, Node};
use dagwire_core::schema::Schema;
use dagwire_core::types::RowBatch;
use dagwire_translate::{ExecutorContext, TranslateError, Translator};

use crate::expr::{apply_renames, parse_renames, Predicate};

/// Output handle of the batch backend.
pub type Dataset = Arc<RowBatch>;

/// Environment handle: named in-memory sources.
#[derive(Debug, Clone, Default)]
pub struct BatchEnv {
    sources: HashMap<String, RowBatch>,
    max_source_rows: Option<usize>,
}

impl BatchEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_source_rows(mut self, rows: Option<usize>) -> Self {
        self.max_source_rows = rows;
        self
    }

    /// Register a source under `name`; scans refer to it as `memory://<name>`
    /// or plain `<name>`.
    pub fn register_source(&mut self, name: impl Into<String>, batch: RowBatch) {
        self.sources.insert(name.into(), batch);
    }

    pub fn source(&self, uri: &str) -> Option<&RowBatch> {
        let key = uri.strip_prefix("memory://").unwrap_or(uri);
        self.sources.get(key)
    }
}

type BatchContext<'a> = ExecutorContext<'a, BatchEnv, Dataset, LogicalOp>;

/// Translates logical operators into evaluated datasets; collects sinks.
#[derive(Debug, Default)]
pub struct BatchTranslator {
    sinks: BTreeMap<String, Dataset>,
}

impl BatchTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink outputs keyed by destination.
    pub fn sinks(&self) -> &BTreeMap<String, Dataset> {
        &self.sinks
    }

    pub fn into_sinks(self) -> BTreeMap<String, Dataset> {
        self.sinks
    }

    fn scan(
        &self,
        ctx: &BatchContext<'_>,
        node: &Node<LogicalOp>,
        source: &str,
        schema: &Schema,
    ) -> Result<Dataset, TranslateError> {
        let env = ctx.environment();
        let mut batch = env
            .source(source)
            .cloned()
            .ok_or_else(|| TranslateError::backend(node, format!("source '{source}' is not registered")))?;
        for field in &schema.fields {
            let column = batch.column(&field.name).ok_or_else(|| {
                TranslateError::backend(
                    node,
                    format!("source '{source}' lacks declared column '{}'", field.name),
                )
            })?;
            column
                .conforms_to(field)
                .map_err(|e| TranslateError::backend(node, format!("source '{source}': {e}")))?;
        }
        if let Some(cap) = env.max_source_rows {
            batch.truncate(cap);
        }
        Ok(Arc::new(batch))
    }
}

impl Translator<LogicalOp> for BatchTranslator {
    type Env = BatchEnv;
    type Output = Dataset;

    fn name(&self) -> &'static str {
        "batch"
    }

    fn translate(
        &mut self,
        ctx: &mut BatchContext<'_>,
        node: &Node<LogicalOp>,
    ) -> Result<Dataset, TranslateError> {
        let fail = |e: &dyn std::fmt::Display| TranslateError::backend(node, e.to_string());

        match node.op() {
            LogicalOp::Scan { source, schema } => self.scan(ctx, node, source, schema),
            LogicalOp::Filter { expr } => {
                let input = ctx.single_input(node.id())?;
                let predicate = Predicate::parse(expr).map_err(|e| fail(&e))?;
                let mask = predicate.evaluate(&input).map_err(|e| fail(&e))?;
                let out = input.filter_rows(&mask).map_err(|e| fail(&e))?;
                Ok(Arc::new(out))
            }
            LogicalOp::Map { expr } => {
                let input = ctx.single_input(node.id())?;
                let renames = parse_renames(expr);
                if renames.is_empty() {
                    return Ok(input);
                }
                Ok(Arc::new(apply_renames(&input, &renames).map_err(|e| fail(&e))?))
            }
            LogicalOp::Project { columns } => {
                let input = ctx.single_input(node.id())?;
                Ok(Arc::new(input.select(columns).map_err(|e| fail(&e))?))
            }
            LogicalOp::Union => {
                let inputs = ctx.inputs(node.id())?;
                let mut out = RowBatch::default();
                for input in &inputs {
                    out.append(input).map_err(|e| fail(&e))?;
                }
                Ok(Arc::new(out))
            }
            LogicalOp::Sink { destination, .. } => {
                let input = ctx.single_input(node.id())?;
                match self.sinks.entry(destination.clone()) {
                    Entry::Occupied(_) => Err(fail(&format!(
                        "destination '{destination}' is written by more than one sink"
                    ))),
                    Entry::Vacant(slot) => {
                        slot.insert(Arc::clone(&input));
                        Ok(input)
                    }
                }
            }
        }
    }
}
