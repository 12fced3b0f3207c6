//! Mango Grading Pipeline
//!
//! Configuration loading, logging setup and the two batch stages: feature
//! extraction from an image folder tree, and classifier training/evaluation
//! over the resulting tables.

use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod extract;
mod settings;
mod train;

pub use extract::{run_extraction, WrittenTable};
pub use settings::{PipelineConfig, TrainingConfig, ENV_PREFIX};
pub use train::run_training;

use classifiers::ClassifierError;
use feature_engine::FeatureError;
use feature_table::TableError;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Settings(#[from] config::ConfigError),
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Extraction(#[from] FeatureError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Training(#[from] ClassifierError),
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Initialize logging
///
/// Logs go to stderr so stdout carries only the confirmation lines.
pub fn init_logging(verbose: bool, format: LogFormat) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    }
    .expect("Failed to set tracing subscriber");
}
