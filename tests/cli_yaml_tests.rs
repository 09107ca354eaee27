//! YAML pipeline parsing and validation tests

use dagwire_core::config::{BackendKind, TranslateConfig};
use dagwire_core::dag::LogicalOp;
use dagwire_planner::{parse_yaml_pipeline, PlanError};

#[test]
fn test_parse_simple_pipeline() {
    let yaml = r#"
steps:
  - op: scan
    source: "memory://input"
    schema:
      - name: "id"
        type: "Int64"
        nullable: false
      - name: "name"
        type: "Utf8"
        nullable: false
  - op: filter
    expr: "id > 10"
  - op: sink
    destination: "memory://result"
"#;

    let parsed = parse_yaml_pipeline(yaml).unwrap();
    let dag = &parsed.dag;
    assert_eq!(dag.len(), 3);
    assert_eq!(dag.roots().len(), 1);
    assert_eq!(dag.leaves().len(), 1);

    let sink = dag.find("sink-2").unwrap();
    match sink.op() {
        LogicalOp::Sink {
            destination,
            format,
        } => {
            assert_eq!(destination, "memory://result");
            assert_eq!(format, "memory");
        }
        other => panic!("expected sink, got {other:?}"),
    }
}

#[test]
fn test_unknown_operator_rejected() {
    let yaml = r#"
steps:
  - op: scan
    source: "memory://sales"
  - op: aggregate
    group_by: ["product"]
"#;

    assert!(matches!(parse_yaml_pipeline(yaml), Err(PlanError::Yaml(_))));
}

#[test]
fn test_union_needs_two_inputs() {
    let yaml = r#"
steps:
  - op: scan
    name: only
    source: "memory://only"
  - op: union
"#;

    match parse_yaml_pipeline(yaml) {
        Err(PlanError::Arity { step, actual, .. }) => {
            assert_eq!(step, "union-1");
            assert_eq!(actual, 1);
        }
        other => panic!("expected arity error, got {other:?}"),
    }
}

#[test]
fn test_config_block_layers_onto_defaults() {
    let yaml = r#"
config:
  backend: stream
  job_name: "clickstream"
steps:
  - op: scan
    source: "kafka://clicks"
  - op: sink
    destination: "kafka://clean"
    format: "json"
"#;

    let parsed = parse_yaml_pipeline(yaml).unwrap();
    let mut cfg = TranslateConfig::default();
    parsed.config.apply(&mut cfg);
    assert_eq!(cfg.backend, BackendKind::Stream);
    assert_eq!(cfg.job_name, "clickstream");
    assert_eq!(cfg.parallelism, 1);
}

#[test]
fn test_explicit_inputs_keep_declared_order() {
    let yaml = r#"
steps:
  - { op: scan, name: a, source: "memory://a" }
  - { op: scan, name: b, source: "memory://b" }
  - { op: union, name: both, inputs: [b, a] }
"#;

    let parsed = parse_yaml_pipeline(yaml).unwrap();
    let dag = &parsed.dag;
    let both = dag.find("both").unwrap();
    let names: Vec<&str> = both
        .parents()
        .iter()
        .map(|p| dag.node(*p).unwrap().name())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}
