//! Classical Classifiers
//!
//! Nearest-neighbor, random forest, linear SVM and linear discriminant
//! classifiers over small dense feature matrices, plus accuracy evaluation.

mod config;
mod dataset;
mod evaluator;
mod forest;
mod knn;
mod lda;
mod linalg;
mod svm;

pub use config::{
    default_classifiers, ClassifierConfig, ClassifierKind, ForestParams, KnnParams, LdaParams,
    SvmParams,
};
pub use dataset::{prepare_splits, Dataset, PreparedSplits};
pub use evaluator::{accuracy, evaluate, AccuracyReport};
pub use forest::{DecisionTree, RandomForest};
pub use knn::KNearestNeighbors;
pub use lda::LinearDiscriminant;
pub use svm::LinearSvm;

use feature_table::TableError;
use ndarray::Array2;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during training and evaluation
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// No training rows
    #[error("Training set is empty")]
    EmptyTrainingSet,

    /// No test rows to score
    #[error("Test set is empty")]
    EmptyTestSet,

    /// `predict` called before `fit`
    #[error("Model '{0}' used before fit")]
    NotFitted(&'static str),

    /// Prediction input width differs from the training width
    #[error("Feature count mismatch: model expects {expected}, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    /// Feature rows and targets disagree, or a target is out of range
    #[error("Dataset shape mismatch: {0}")]
    Shape(String),

    /// Hyperparameter outside its valid range
    #[error("Invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    /// Results table could not be written
    #[error("Failed to write report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Table or label encoding failure
    #[error(transparent)]
    Table(#[from] TableError),
}

/// A supervised classifier over integer-coded labels
pub trait Classifier {
    /// Model family name used in logs
    fn kind(&self) -> &'static str;

    /// Fit on a training dataset, replacing any previous fit
    fn fit(&mut self, data: &Dataset) -> Result<(), ClassifierError>;

    /// Predict a label code for every row of `features`
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>, ClassifierError>;
}

/// Index of the largest value; ties resolve to the lowest index
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

pub(crate) fn check_width(expected: usize, features: &Array2<f64>) -> Result<(), ClassifierError> {
    if features.ncols() != expected {
        return Err(ClassifierError::FeatureMismatch {
            expected,
            actual: features.ncols(),
        });
    }
    Ok(())
}
