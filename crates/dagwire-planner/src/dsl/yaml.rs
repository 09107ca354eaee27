//! YAML → `Dag<LogicalOp>` parser.
//!
//! Example:
//! ```yaml
//! config: { backend: batch }
//! steps:
//!   - op: scan
//!     name: users
//!     source: "memory://users"
//!     schema:
//!       - { name: "id",  type: "Int64", nullable: false }
//!       - { name: "age", type: "Int64", nullable: false }
//!   - op: filter
//!     name: adults
//!     expr: "age >= 18"
//!   - op: filter
//!     name: minors
//!     inputs: [users]
//!     expr: "age < 18"
//!   - op: union
//!     inputs: [adults, minors]
//!   - op: sink
//!     destination: "memory://everyone"
//!     format: "memory"
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use dagwire_core::config::{BackendKind, TranslateConfig};
use dagwire_core::dag::{Dag, LogicalOp};
use dagwire_core::id::OpId;
use dagwire_core::schema::{DataType, Field, Schema};

use crate::error::PlanError;
use crate::validate::validate_arity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub config: Option<PipelineConfig>,
    pub steps: Vec<StepDef>,
}

/// One pipeline step: optional name/inputs plus the operator itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDef {
    #[serde(default)]
    pub name: Option<String>,
    /// Names of earlier steps; defaults to the step right above.
    #[serde(default)]
    pub inputs: Option<Vec<String>>,
    #[serde(flatten)]
    pub step: Step,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "op")]
pub enum Step {
    Scan {
        source: String,
        #[serde(default)]
        schema: Vec<FieldDef>,
    },
    Filter {
        expr: String,
    },
    Map {
        expr: String,
    },
    Project {
        columns: Vec<String>,
    },
    Union,
    Sink {
        destination: String,
        #[serde(default = "default_format")]
        format: String,
    },
}

fn default_format() -> String {
    "memory".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
}

/// Per-pipeline overrides layered on top of `TranslateConfig::from_env`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub backend: Option<BackendKind>,
    pub parallelism: Option<usize>,
    pub max_source_rows: Option<usize>,
    pub job_name: Option<String>,
}

impl PipelineConfig {
    pub fn apply(&self, cfg: &mut TranslateConfig) {
        if let Some(backend) = self.backend {
            cfg.backend = backend;
        }
        if let Some(p) = self.parallelism {
            cfg.parallelism = p;
        }
        if let Some(rows) = self.max_source_rows {
            cfg.max_source_rows = Some(rows);
        }
        if let Some(name) = &self.job_name {
            cfg.job_name = name.clone();
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedPipeline {
    pub dag: Dag<LogicalOp>,
    pub config: PipelineConfig,
}

fn to_schema(fields: &[FieldDef]) -> Schema {
    Schema::new(
        fields
            .iter()
            .map(|f| Field::new(f.name.clone(), DataType::parse(&f.data_type), f.nullable))
            .collect(),
    )
}

fn to_logical(step: Step) -> LogicalOp {
    match step {
        Step::Scan { source, schema } => LogicalOp::Scan {
            source,
            schema: to_schema(&schema),
        },
        Step::Filter { expr } => LogicalOp::Filter { expr },
        Step::Map { expr } => LogicalOp::Map { expr },
        Step::Project { columns } => LogicalOp::Project { columns },
        Step::Union => LogicalOp::Union,
        Step::Sink {
            destination,
            format,
        } => LogicalOp::Sink {
            destination,
            format,
        },
    }
}

/// Parse a YAML pipeline into a validated operator DAG.
pub fn parse_yaml_pipeline(yaml_src: &str) -> Result<ParsedPipeline, PlanError> {
    let doc: Pipeline = serde_yaml::from_str(yaml_src)?;
    if doc.steps.is_empty() {
        return Err(PlanError::Empty);
    }

    let mut builder = Dag::builder();
    let mut by_name: HashMap<String, OpId> = HashMap::new();
    let mut previous: Option<OpId> = None;

    for (idx, def) in doc.steps.into_iter().enumerate() {
        let op = to_logical(def.step);
        let name = def
            .name
            .unwrap_or_else(|| format!("{}-{}", op.key(), idx));
        if by_name.contains_key(&name) {
            return Err(PlanError::DuplicateStep(name));
        }

        let parents: Vec<OpId> = match (def.inputs, &op) {
            (Some(inputs), _) => inputs
                .into_iter()
                .map(|input| {
                    by_name.get(&input).copied().ok_or_else(|| PlanError::UnknownInput {
                        step: name.clone(),
                        input,
                    })
                })
                .collect::<Result<_, _>>()?,
            (None, LogicalOp::Scan { .. }) => Vec::new(),
            (None, _) => match previous {
                Some(p) => vec![p],
                None => return Err(PlanError::MissingInput { step: name }),
            },
        };

        let id = builder.add(name.clone(), op, &parents)?;
        by_name.insert(name, id);
        previous = Some(id);
    }

    let dag = builder.build();
    validate_arity(&dag)?;
    Ok(ParsedPipeline {
        dag,
        config: doc.config.unwrap_or_default(),
    })
}
