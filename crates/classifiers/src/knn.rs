//! k-Nearest Neighbors Classifier

use crate::{argmax, check_width, Classifier, ClassifierError, Dataset};
use ndarray::{Array2, ArrayView1};
use tracing::warn;

/// Majority vote among the `k` closest training samples (Euclidean).
///
/// Distance ties keep training order; vote ties go to the lowest label code.
/// `k` is clamped to the training set size.
#[derive(Debug, Clone)]
pub struct KNearestNeighbors {
    n_neighbors: usize,
    fitted: Option<Fitted>,
}

#[derive(Debug, Clone)]
struct Fitted {
    features: Array2<f64>,
    targets: Vec<usize>,
    n_classes: usize,
    k: usize,
}

impl KNearestNeighbors {
    pub fn new(n_neighbors: usize) -> Result<Self, ClassifierError> {
        if n_neighbors == 0 {
            return Err(ClassifierError::InvalidHyperparameter(
                "n_neighbors must be at least 1".into(),
            ));
        }
        Ok(Self {
            n_neighbors,
            fitted: None,
        })
    }

    fn vote(&self, fitted: &Fitted, query: ArrayView1<'_, f64>) -> usize {
        let mut distances: Vec<(f64, usize)> = fitted
            .features
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let d: f64 = row.iter().zip(query.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
                (d, i)
            })
            .collect();
        distances.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut votes = vec![0.0; fitted.n_classes];
        for &(_, i) in distances.iter().take(fitted.k) {
            votes[fitted.targets[i]] += 1.0;
        }
        argmax(&votes)
    }
}

impl Classifier for KNearestNeighbors {
    fn kind(&self) -> &'static str {
        "k_nearest_neighbors"
    }

    fn fit(&mut self, data: &Dataset) -> Result<(), ClassifierError> {
        if data.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        let k = self.n_neighbors.min(data.n_samples());
        if k < self.n_neighbors {
            warn!(
                "n_neighbors={} exceeds {} training samples; using k={}",
                self.n_neighbors,
                data.n_samples(),
                k
            );
        }
        self.fitted = Some(Fitted {
            features: data.features().clone(),
            targets: data.targets().to_vec(),
            n_classes: data.n_classes(),
            k,
        });
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>, ClassifierError> {
        let fitted = self.fitted.as_ref().ok_or(ClassifierError::NotFitted("knn"))?;
        check_width(fitted.features.ncols(), features)?;
        Ok(features.rows().into_iter().map(|row| self.vote(fitted, row)).collect())
    }
}
