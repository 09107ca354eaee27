//! End-to-end integration tests: YAML → DAG → backend through the engine.

use std::collections::HashMap;

use dagwire_core::config::{BackendKind, TranslateConfig};
use dagwire_core::types::{Column, RowBatch, Scalar};
use dagwire_exec::{Engine, ExecError};
use dagwire_planner::parse_yaml_pipeline;
use dagwire_translate::{BindingErrorKind, TranslateError};

const PIPELINE: &str = r#"
steps:
  - op: scan
    name: users
    source: "memory://users"
    schema:
      - { name: "id", type: "Int64" }
      - { name: "age", type: "Int64" }
      - { name: "email", type: "Utf8" }
  - op: filter
    name: adults
    expr: "age >= 18"
  - op: filter
    name: minors
    inputs: [users]
    expr: "age < 18"
  - op: union
    name: everyone
    inputs: [adults, minors]
  - op: map
    name: renamed
    expr: "email AS contact"
  - op: project
    name: slim
    columns: ["id", "contact"]
  - op: sink
    name: out
    destination: "memory://out"
"#;

fn users() -> RowBatch {
    let ages = [34, 12, 51, 17, 18];
    RowBatch::new(vec![
        Column::new("id", (0..ages.len() as i64).map(Scalar::I64).collect()),
        Column::new("age", ages.iter().map(|a| Scalar::I64(*a)).collect()),
        Column::new(
            "email",
            (0..ages.len())
                .map(|i| Scalar::Str(format!("user{i}@example.com")))
                .collect(),
        ),
    ])
}

fn sources() -> HashMap<String, RowBatch> {
    HashMap::from([("users".to_string(), users())])
}

#[test]
fn test_batch_pipeline_end_to_end() {
    let parsed = parse_yaml_pipeline(PIPELINE).unwrap();
    let engine = Engine::new(TranslateConfig::default()).unwrap();
    let run = engine.run_batch(&parsed.dag, sources()).unwrap();

    let out = &run.sinks["memory://out"];
    assert_eq!(out.column_names(), vec!["id", "contact"]);
    // adults first (ids 0, 2, 4), then minors (ids 1, 3)
    let ids: Vec<Scalar> = out.column("id").unwrap().values.clone();
    assert_eq!(
        ids,
        vec![
            Scalar::I64(0),
            Scalar::I64(2),
            Scalar::I64(4),
            Scalar::I64(1),
            Scalar::I64(3)
        ]
    );
    assert_eq!(run.manifest.operators_bound, parsed.dag.len());
    assert!(run.manifest.finished_ms >= run.manifest.started_ms);
}

#[test]
fn test_batch_outputs_are_deterministic() {
    let parsed = parse_yaml_pipeline(PIPELINE).unwrap();
    let engine = Engine::new(TranslateConfig::default()).unwrap();
    let first = engine.run_batch(&parsed.dag, sources()).unwrap();
    let second = engine.run_batch(&parsed.dag, sources()).unwrap();
    assert_eq!(first.manifest.dag_hash, second.manifest.dag_hash);
    assert_eq!(first.manifest.program_hash, second.manifest.program_hash);
    assert_eq!(first.sinks, second.sinks);
}

#[test]
fn test_source_row_cap() {
    let parsed = parse_yaml_pipeline(PIPELINE).unwrap();
    let engine = Engine::new(TranslateConfig {
        max_source_rows: Some(2),
        ..Default::default()
    })
    .unwrap();
    let run = engine.run_batch(&parsed.dag, sources()).unwrap();
    // ages 34 and 12 survive the cap
    assert_eq!(run.sinks["memory://out"].num_rows(), 2);
}

#[test]
fn test_missing_source_aborts_the_pass() {
    let parsed = parse_yaml_pipeline(PIPELINE).unwrap();
    let engine = Engine::new(TranslateConfig::default()).unwrap();
    let err = engine.run_batch(&parsed.dag, HashMap::new()).unwrap_err();
    match err {
        ExecError::Translate(TranslateError::Backend { name, .. }) => assert_eq!(name, "users"),
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[test]
fn test_stream_lowering_mirrors_the_dag() {
    let parsed = parse_yaml_pipeline(PIPELINE).unwrap();
    let engine = Engine::new(TranslateConfig {
        backend: BackendKind::Stream,
        parallelism: 4,
        job_name: "users-job".into(),
        ..Default::default()
    })
    .unwrap();
    let run = engine.lower_stream(&parsed.dag).unwrap();
    let program = &run.program;

    assert_eq!(program.job_name, "users-job");
    assert_eq!(program.stages.len(), parsed.dag.len());
    assert_eq!(program.sinks.len(), 1);

    let union = program.stages.iter().find(|s| s.name == "everyone").unwrap();
    let upstream: Vec<&str> = union
        .inputs
        .iter()
        .map(|id| program.stage(*id).unwrap().name.as_str())
        .collect();
    assert_eq!(upstream, vec!["adults", "minors"]);
    assert_eq!(union.parallelism, 4);
    assert_eq!(run.manifest.backend, "stream");
}

#[test]
fn test_binding_errors_surface_through_the_engine_error() {
    use dagwire_core::dag::{Dag, LogicalOp};
    use dagwire_exec::{BatchEnv, BatchTranslator};
    use dagwire_translate::translate_in_order;

    let mut b = Dag::builder();
    let scan = b
        .add(
            "scan",
            LogicalOp::Scan {
                source: "memory://users".into(),
                schema: Default::default(),
            },
            &[],
        )
        .unwrap();
    let filter = b
        .add("filter", LogicalOp::Filter { expr: "age > 1".into() }, &[scan])
        .unwrap();
    let dag = b.build();

    let mut env = BatchEnv::new();
    env.register_source("users", users());
    let err = translate_in_order(&dag, &[filter, scan], env, &mut BatchTranslator::new())
        .unwrap_err();
    assert_eq!(err.binding_kind(), Some(BindingErrorKind::MissingBinding));
    assert_eq!(err.op(), filter);

    let wrapped: ExecError = err.into();
    assert!(wrapped.to_string().contains("filter"));
}
