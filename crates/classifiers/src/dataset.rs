//! Encoded Training Datasets

use crate::ClassifierError;
use feature_table::{FeatureSchema, FeatureTable, LabelEncoder};
use ndarray::{Array2, ArrayView1};
use tracing::info;

/// Feature matrix (one row per sample) with integer label codes
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Array2<f64>,
    targets: Vec<usize>,
    n_classes: usize,
}

impl Dataset {
    /// Create a dataset; every target must be below `n_classes`
    pub fn new(features: Array2<f64>, targets: Vec<usize>, n_classes: usize) -> Result<Self, ClassifierError> {
        if features.nrows() != targets.len() {
            return Err(ClassifierError::Shape(format!(
                "{} feature rows but {} targets",
                features.nrows(),
                targets.len()
            )));
        }
        if let Some(&bad) = targets.iter().find(|&&t| t >= n_classes) {
            return Err(ClassifierError::Shape(format!(
                "target {} out of range for {} classes",
                bad, n_classes
            )));
        }
        Ok(Self {
            features,
            targets,
            n_classes,
        })
    }

    /// Split a table into features and codes using an already fitted encoder
    pub fn from_table(table: &FeatureTable, encoder: &LabelEncoder) -> Result<Self, ClassifierError> {
        let targets = encoder.transform(&table.labels())?;
        let width = table.schema().width();
        let flat: Vec<f64> = table
            .records()
            .iter()
            .flat_map(|r| r.features.iter().copied())
            .collect();
        let features = Array2::from_shape_vec((table.len(), width), flat)
            .map_err(|e| ClassifierError::Shape(e.to_string()))?;
        Self::new(features, targets, encoder.n_classes())
    }

    /// Feature matrix
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Label codes in row order
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Number of classes known to the encoder
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Feature row `i`
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.features.row(i)
    }

    /// Distinct label codes present, ascending
    pub fn present_classes(&self) -> Vec<usize> {
        let mut seen = vec![false; self.n_classes];
        for &t in &self.targets {
            seen[t] = true;
        }
        seen.iter()
            .enumerate()
            .filter_map(|(c, &s)| s.then_some(c))
            .collect()
    }
}

/// Train/test datasets encoded with one shared encoder
#[derive(Debug, Clone)]
pub struct PreparedSplits {
    pub encoder: LabelEncoder,
    pub schema: FeatureSchema,
    pub train: Dataset,
    pub test: Dataset,
}

/// Validate and encode a train/test pair.
///
/// The encoder is fit on the training labels only; a test label outside that
/// set fails here, before any model is trained.
pub fn prepare_splits(train: &FeatureTable, test: &FeatureTable) -> Result<PreparedSplits, ClassifierError> {
    train.schema().ensure_matches(test.schema())?;
    if train.is_empty() {
        return Err(ClassifierError::EmptyTrainingSet);
    }
    if test.is_empty() {
        return Err(ClassifierError::EmptyTestSet);
    }

    let encoder = LabelEncoder::fit(&train.labels());
    let train_data = Dataset::from_table(train, &encoder)?;
    let test_data = Dataset::from_table(test, &encoder)?;
    info!(
        "Encoded {} classes: train={} rows, test={} rows",
        encoder.n_classes(),
        train_data.n_samples(),
        test_data.n_samples()
    );

    Ok(PreparedSplits {
        encoder,
        schema: train.schema().clone(),
        train: train_data,
        test: test_data,
    })
}
