//! Categorical Label Encoding

use crate::error::{Result, TableError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maps class label strings to integer codes.
///
/// Classes are sorted lexicographically when fitted and each code is the
/// class's index in that order. Fit once on the training labels and reuse the
/// same encoder for every other split.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit an encoder on the distinct values of `labels`
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: BTreeSet<&str> = labels.iter().map(AsRef::as_ref).collect();
        Self {
            classes: classes.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Fit on `labels` and return their codes
    pub fn fit_transform<S: AsRef<str>>(labels: &[S]) -> Result<(Self, Vec<usize>)> {
        let encoder = Self::fit(labels);
        let codes = encoder.transform(labels)?;
        Ok((encoder, codes))
    }

    /// Encode labels; fails on any label absent from the fitted set
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        if self.classes.is_empty() {
            return Err(TableError::NotFitted);
        }
        labels.iter().map(|l| self.code_of(l.as_ref())).collect()
    }

    /// Decode integer codes back into label strings
    pub fn inverse_transform(&self, codes: &[usize]) -> Result<Vec<String>> {
        codes
            .iter()
            .map(|&code| {
                self.classes
                    .get(code)
                    .cloned()
                    .ok_or(TableError::CodeOutOfRange {
                        code,
                        n_classes: self.classes.len(),
                    })
            })
            .collect()
    }

    /// Code of a single label
    pub fn code_of(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| TableError::UnknownLabel(label.to_string()))
    }

    /// Fitted classes in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of fitted classes
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
