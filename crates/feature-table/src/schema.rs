//! Explicit Feature Column Schema

use crate::error::{Result, TableError};
use serde::{Deserialize, Serialize};

/// Name of the trailing class label column
pub const LABEL_COLUMN: &str = "Label";

/// Ordered feature column names; the label column is implicit and always last
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema from ordered feature column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// GLCM texture plus per-channel RGB averages
    pub fn rgb() -> Self {
        Self::new(["Contrast", "Correlation", "Avg_Red", "Avg_Green", "Avg_Blue"])
    }

    /// GLCM texture plus a single intensity average (masked variant)
    pub fn intensity() -> Self {
        Self::new(["Contrast", "Correlation", "Avg_Intensity"])
    }

    /// Feature column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of feature columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Full CSV header including the label column
    pub fn header(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(LABEL_COLUMN))
            .collect()
    }

    /// Check that `other` has the same columns in the same order
    pub fn ensure_matches(&self, other: &FeatureSchema) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(TableError::SchemaMismatch {
                expected: self.header().join(","),
                found: other.header().join(","),
            })
        }
    }
}
