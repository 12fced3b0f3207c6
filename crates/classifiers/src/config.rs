//! Classifier Configuration

use crate::{
    Classifier, ClassifierError, KNearestNeighbors, LinearDiscriminant, LinearSvm, RandomForest,
};
use serde::{Deserialize, Serialize};

/// k-nearest-neighbors hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnnParams {
    pub n_neighbors: usize,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self { n_neighbors: 5 }
    }
}

/// Random forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features tried per split; `None` means ⌊√d⌋
    pub max_features: Option<usize>,
    pub bootstrap: bool,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
            bootstrap: true,
        }
    }
}

/// Linear SVM hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvmParams {
    pub c: f64,
    pub tolerance: f64,
    pub max_iter: usize,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-3,
            max_iter: 100_000,
        }
    }
}

/// Linear discriminant hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdaParams {
    /// Ridge added to the pooled covariance, relative to its mean variance
    pub regularization: f64,
}

impl Default for LdaParams {
    fn default() -> Self {
        Self {
            regularization: 1e-6,
        }
    }
}

/// Model family and its hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifierKind {
    Knn(KnnParams),
    RandomForest(ForestParams),
    LinearSvm(SvmParams),
    Lda(LdaParams),
}

/// A named classifier to train and score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Display name written to the results table
    pub name: String,
    pub model: ClassifierKind,
}

impl ClassifierConfig {
    pub fn new(name: impl Into<String>, model: ClassifierKind) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }

    /// Instantiate an unfitted classifier
    pub fn build(&self) -> Result<Box<dyn Classifier>, ClassifierError> {
        Ok(match &self.model {
            ClassifierKind::Knn(p) => Box::new(KNearestNeighbors::new(p.n_neighbors)?),
            ClassifierKind::RandomForest(p) => Box::new(RandomForest::new(
                p.n_estimators,
                p.max_depth,
                p.min_samples_split,
                p.max_features,
                p.bootstrap,
                p.seed,
            )?),
            ClassifierKind::LinearSvm(p) => {
                Box::new(LinearSvm::new(p.c, p.tolerance, p.max_iter)?)
            }
            ClassifierKind::Lda(p) => Box::new(LinearDiscriminant::new(p.regularization)?),
        })
    }
}

/// KNN, Random Forest, SVM and LDA with their default settings, in that order
pub fn default_classifiers() -> Vec<ClassifierConfig> {
    vec![
        ClassifierConfig::new("KNN", ClassifierKind::Knn(KnnParams::default())),
        ClassifierConfig::new(
            "Random Forest",
            ClassifierKind::RandomForest(ForestParams::default()),
        ),
        ClassifierConfig::new("SVM", ClassifierKind::LinearSvm(SvmParams::default())),
        ClassifierConfig::new("LDA", ClassifierKind::Lda(LdaParams::default())),
    ]
}
