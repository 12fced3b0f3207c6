//! Feature Table Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading, writing or encoding feature tables
#[derive(Debug, Error)]
pub enum TableError {
    /// File could not be opened or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Underlying CSV reader/writer failure
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Header does not end with the label column
    #[error("{path}: missing trailing '{expected}' column")]
    MissingLabelColumn { path: PathBuf, expected: &'static str },

    /// Header has a label column but no features
    #[error("{path}: table has no feature columns")]
    NoFeatureColumns { path: PathBuf },

    /// Header differs from the expected schema
    #[error("Schema mismatch: expected [{expected}], found [{found}]")]
    SchemaMismatch { expected: String, found: String },

    /// A cell could not be parsed as a number
    #[error("{path}: row {row}, column '{column}': '{value}' is not a valid number")]
    Parse {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    /// A cell parsed to NaN or an infinity
    #[error("{path}: row {row}, column '{column}': '{value}' is not finite")]
    NonFinite {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    /// A row has a different number of cells than the header
    #[error("{path}: row {row} has {found} cells, expected {expected}")]
    RowWidth {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Record feature count differs from the schema width
    #[error("Record {index} has {found} features, schema expects {expected}")]
    RecordWidth {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Label never seen while fitting the encoder
    #[error("Unknown label '{0}': not present in the fitted label set")]
    UnknownLabel(String),

    /// Encoded value outside the fitted class range
    #[error("Label code {code} out of range for {n_classes} classes")]
    CodeOutOfRange { code: usize, n_classes: usize },

    /// Encoder used before fitting
    #[error("Label encoder has not been fitted")]
    NotFitted,
}

/// Result alias for table operations
pub type Result<T> = std::result::Result<T, TableError>;
