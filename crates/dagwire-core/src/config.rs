//! Translation configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which backend a translation pass targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Bounded, eagerly evaluated in-memory batches.
    #[default]
    Batch,
    /// Unbounded stage graph (lowering only; nothing is executed).
    Stream,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Batch => "batch",
            BackendKind::Stream => "stream",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" => Ok(BackendKind::Batch),
            "stream" | "streaming" => Ok(BackendKind::Stream),
            other => Err(Error::Config(format!("unknown backend '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    pub backend: BackendKind,

    /// Default parallelism assigned to every stream stage.
    pub parallelism: usize,

    /// Optional cap on rows loaded per batch source.
    pub max_source_rows: Option<usize>,

    /// Job name recorded by the stream backend.
    pub job_name: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Batch,
            parallelism: 1,
            max_source_rows: None,
            job_name: "dagwire".to_string(),
        }
    }
}

impl TranslateConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `DAGWIRE_BACKEND`: `batch` or `stream`
    /// - `DAGWIRE_PARALLELISM`: stream stage parallelism
    /// - `DAGWIRE_MAX_SOURCE_ROWS`: row cap per batch source
    /// - `DAGWIRE_JOB_NAME`: job name
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("DAGWIRE_BACKEND") {
            if let Ok(v) = s.parse::<BackendKind>() {
                cfg.backend = v;
            }
        }

        if let Ok(s) = std::env::var("DAGWIRE_PARALLELISM") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.parallelism = v;
            }
        }

        if let Ok(s) = std::env::var("DAGWIRE_MAX_SOURCE_ROWS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_source_rows = Some(v);
            }
        }

        if let Ok(s) = std::env::var("DAGWIRE_JOB_NAME") {
            cfg.job_name = s;
        }

        cfg
    }

    /// Reject values no backend can work with.
    pub fn validate(&self) -> Result<()> {
        if self.parallelism == 0 {
            return Err(Error::Config("parallelism must be at least 1".into()));
        }
        if self.job_name.trim().is_empty() {
            return Err(Error::Config("job name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_round_trip() {
        for kind in [BackendKind::Batch, BackendKind::Stream] {
            assert_eq!(kind.as_str().parse::<BackendKind>().unwrap(), kind);
        }
        assert_eq!("Streaming".parse::<BackendKind>().unwrap(), BackendKind::Stream);
        assert!("flink".parse::<BackendKind>().is_err());
    }

    #[test]
    fn zero_parallelism_is_invalid() {
        let cfg = TranslateConfig {
            parallelism: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
        assert!(TranslateConfig::default().validate().is_ok());
    }
}
