//! dagwire CLI: validate, explain, and run YAML pipelines.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dagwire_core::config::{BackendKind, TranslateConfig};
use dagwire_core::types::RowBatch;
use dagwire_exec::Engine;
use dagwire_planner::{parse_yaml_pipeline, PipelineConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dagwire")]
#[command(about = "dagwire: translate logical dataflow DAGs onto batch or stream backends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate and run a pipeline from a YAML file
    Run {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// In-memory source as NAME=PATH (a JSON-encoded row batch); repeatable
        #[arg(long = "source", value_parser = parse_source_arg)]
        sources: Vec<(String, PathBuf)>,

        /// Backend to translate onto (overrides config)
        #[arg(long)]
        backend: Option<BackendKind>,

        /// Stream stage parallelism (overrides config)
        #[arg(long)]
        parallelism: Option<usize>,
    },

    /// Validate a pipeline YAML file (syntax, references, arity)
    Validate {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Show the logical DAG and its stream lowering (EXPLAIN)
    Explain {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            pipeline,
            sources,
            backend,
            parallelism,
        } => {
            if let Err(e) = run_pipeline(&pipeline, &sources, backend, parallelism) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate { pipeline } => {
            if let Err(e) = validate_pipeline(&pipeline) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
            println!("✓ Pipeline is valid");
        }
        Commands::Explain { pipeline } => {
            if let Err(e) = explain_pipeline(&pipeline) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn parse_source_arg(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected NAME=PATH, got '{raw}'")),
    }
}

/// Env defaults, then the pipeline's `config:` block, then CLI flags.
fn layered_config(
    pipeline: &PipelineConfig,
    backend: Option<BackendKind>,
    parallelism: Option<usize>,
) -> TranslateConfig {
    let mut config = TranslateConfig::from_env();
    pipeline.apply(&mut config);
    if let Some(backend) = backend {
        config.backend = backend;
    }
    if let Some(p) = parallelism {
        config.parallelism = p;
    }
    config
}

fn load_sources(sources: &[(String, PathBuf)]) -> CliResult<HashMap<String, RowBatch>> {
    let mut out = HashMap::new();
    for (name, path) in sources {
        let text = fs::read_to_string(path)?;
        let batch: RowBatch = serde_json::from_str(&text)
            .map_err(|e| format!("source '{}' ({}): {}", name, path.display(), e))?;
        tracing::debug!(source = %name, rows = batch.num_rows(), "loaded source");
        out.insert(name.clone(), batch);
    }
    Ok(out)
}

fn run_pipeline(
    pipeline_path: &Path,
    sources: &[(String, PathBuf)],
    backend: Option<BackendKind>,
    parallelism: Option<usize>,
) -> CliResult<()> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;
    let config = layered_config(&parsed.config, backend, parallelism);
    let engine = Engine::new(config)?;

    let manifest = match engine.backend() {
        BackendKind::Batch => {
            let run = engine.run_batch(&parsed.dag, load_sources(sources)?)?;
            for (dest, batch) in &run.sinks {
                println!("{} ({} rows)", dest, batch.num_rows());
                println!("{}", serde_json::to_string_pretty(batch)?);
            }
            run.manifest
        }
        BackendKind::Stream => {
            if !sources.is_empty() {
                tracing::warn!("--source is ignored by the stream backend");
            }
            let run = engine.lower_stream(&parsed.dag)?;
            println!("{}", serde_json::to_string_pretty(&run.program)?);
            run.manifest
        }
    };

    println!("✓ Pipeline translated successfully");
    println!("  Backend: {}", manifest.backend);
    println!("  Operators bound: {}", manifest.operators_bound);
    println!("  Duration: {}ms", manifest.duration_ms());
    println!("  DAG hash: {}", manifest.dag_hash);
    if let Some(h) = manifest.program_hash {
        println!("  Program hash: {}", h);
    }

    Ok(())
}

fn validate_pipeline(pipeline_path: &Path) -> CliResult<()> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let _ = parse_yaml_pipeline(&yaml_content)?;
    Ok(())
}

fn explain_pipeline(pipeline_path: &Path) -> CliResult<()> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;
    let config = layered_config(&parsed.config, None, None);
    let dag = &parsed.dag;

    println!("Pipeline Translation Plan");
    println!("=========================");
    println!();
    println!("Backend: {}", config.backend.as_str());
    println!("Job: {} (parallelism {})", config.job_name, config.parallelism);
    println!();
    println!("Logical DAG ({} operators):", dag.len());
    for (i, node) in dag.nodes().enumerate() {
        let parents: Vec<&str> = node
            .parents()
            .iter()
            .filter_map(|p| dag.node(*p).map(|n| n.name()))
            .collect();
        println!(
            "  {}. {} [{}] <- [{}]",
            i + 1,
            node.name(),
            node.op().key(),
            parents.join(", ")
        );
    }

    let stream = Engine::new(config)?.lower_stream(dag)?;
    println!();
    println!("Stream Stages:");
    for stage in &stream.program.stages {
        let inputs: Vec<String> = stage.inputs.iter().map(|s| s.to_string()).collect();
        println!(
            "  {} {} '{}' x{} <- [{}]",
            stage.id,
            stage.key,
            stage.name,
            stage.parallelism,
            inputs.join(", ")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_config_overrides_defaults() {
        let pipeline = PipelineConfig {
            backend: Some(BackendKind::Stream),
            job_name: Some("nightly".into()),
            ..Default::default()
        };
        let mut config = TranslateConfig::default();
        pipeline.apply(&mut config);
        assert_eq!(config.backend, BackendKind::Stream);
        assert_eq!(config.job_name, "nightly");
        assert_eq!(config.parallelism, 1);
    }

    #[test]
    fn cli_flags_take_priority_over_pipeline_config() {
        let pipeline = PipelineConfig {
            backend: Some(BackendKind::Stream),
            parallelism: Some(4),
            ..Default::default()
        };
        let config = layered_config(&pipeline, Some(BackendKind::Batch), Some(8));
        assert_eq!(config.backend, BackendKind::Batch);
        assert_eq!(config.parallelism, 8);
    }

    #[test]
    fn source_args_need_name_and_path() {
        let (name, path) = parse_source_arg("users=data/users.json").unwrap();
        assert_eq!(name, "users");
        assert_eq!(path, PathBuf::from("data/users.json"));
        assert!(parse_source_arg("users").is_err());
        assert!(parse_source_arg("=x.json").is_err());
    }
}
