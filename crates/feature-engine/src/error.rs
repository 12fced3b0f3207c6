//! Feature Extraction Error Types

use feature_table::TableError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during feature extraction
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Image file with a recognized extension failed to decode
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Required directory does not exist
    #[error("Directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// None of the configured splits exist under the root
    #[error("No split folders ({splits}) found under {root}")]
    NoSplits { root: PathBuf, splits: String },

    /// Directory listing failed
    #[error("Failed to read directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid extraction parameters
    #[error("Configuration error: {0}")]
    Config(String),

    /// Feature vector did not fit the table schema
    #[error(transparent)]
    Table(#[from] TableError),
}
