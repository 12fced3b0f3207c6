//! Layered Pipeline Configuration
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file,
//! then `MANGO_`-prefixed environment variables with `__` between nested keys
//! (`MANGO_EXTRACTION__MASKED=true`).

use crate::PipelineError;
use classifiers::{default_classifiers, ClassifierConfig};
use config::{Config, Environment, File};
use feature_engine::ExtractionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "MANGO";

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub extraction: ExtractionConfig,
    pub training: TrainingConfig,
}

/// Trainer inputs, outputs and classifier set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    pub results_path: PathBuf,
    /// Classifiers to fit, in report order
    pub classifiers: Vec<ClassifierConfig>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            train_path: PathBuf::from("train.csv"),
            test_path: PathBuf::from("test.csv"),
            results_path: PathBuf::from("resultsWithTrain.csv"),
            classifiers: default_classifiers(),
        }
    }
}

impl PipelineConfig {
    /// Load defaults, then `path` if given, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self, PipelineError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}
