//! Linear Discriminant Analysis

use crate::linalg::solve;
use crate::{check_width, Classifier, ClassifierError, Dataset};
use ndarray::{Array1, Array2, Axis};
use tracing::{debug, warn};

/// Gaussian class-conditional model with a shared covariance matrix.
///
/// A ridge of `regularization · trace(Σ)/d` is added to the pooled covariance
/// so collinear or constant features still give a solvable system.
#[derive(Debug, Clone)]
pub struct LinearDiscriminant {
    regularization: f64,
    fitted: Option<Fitted>,
}

#[derive(Debug, Clone)]
struct Fitted {
    classes: Vec<usize>,
    /// One column of coefficients per present class
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

impl LinearDiscriminant {
    pub fn new(regularization: f64) -> Result<Self, ClassifierError> {
        if !(regularization >= 0.0 && regularization.is_finite()) {
            return Err(ClassifierError::InvalidHyperparameter(format!(
                "regularization must be non-negative, got {}",
                regularization
            )));
        }
        Ok(Self {
            regularization,
            fitted: None,
        })
    }

    /// Pooled within-class covariance plus ridge
    fn pooled_covariance(&self, data: &Dataset, means: &Array2<f64>, classes: &[usize]) -> Array2<f64> {
        let d = data.n_features();
        let mut scatter = Array2::<f64>::zeros((d, d));
        for (i, row) in data.features().rows().into_iter().enumerate() {
            let slot = classes
                .iter()
                .position(|&c| c == data.targets()[i])
                .unwrap_or_default();
            let centered = &row - &means.row(slot);
            let outer = centered
                .view()
                .insert_axis(Axis(1))
                .dot(&centered.view().insert_axis(Axis(0)));
            scatter += &outer;
        }
        let dof = data.n_samples().saturating_sub(classes.len()).max(1);
        let mut cov = scatter / dof as f64;

        let trace = cov.diag().sum();
        let ridge = (self.regularization * trace / d as f64).max(1e-9);
        cov.diag_mut().mapv_inplace(|v| v + ridge);
        cov
    }
}

impl Classifier for LinearDiscriminant {
    fn kind(&self) -> &'static str {
        "linear_discriminant"
    }

    fn fit(&mut self, data: &Dataset) -> Result<(), ClassifierError> {
        if data.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        let classes = data.present_classes();
        if classes.len() == 1 {
            warn!("Training data holds a single class; LDA will predict it for every sample");
        }
        let d = data.n_features();
        let n = data.n_samples() as f64;

        let mut means = Array2::<f64>::zeros((classes.len(), d));
        let mut priors = Array1::<f64>::zeros(classes.len());
        for (slot, &class) in classes.iter().enumerate() {
            let rows: Vec<usize> = (0..data.n_samples())
                .filter(|&i| data.targets()[i] == class)
                .collect();
            let subset = data.features().select(Axis(0), &rows);
            if let Some(mean) = subset.mean_axis(Axis(0)) {
                means.row_mut(slot).assign(&mean);
            }
            priors[slot] = rows.len() as f64 / n;
        }

        let cov = self.pooled_covariance(data, &means, &classes);
        let coef = solve(&cov, &means.t().to_owned()).ok_or_else(|| {
            ClassifierError::Shape("pooled covariance is singular".into())
        })?;

        let intercept = Array1::from_iter((0..classes.len()).map(|slot| {
            -0.5 * means.row(slot).dot(&coef.column(slot)) + priors[slot].ln()
        }));
        debug!("LDA fitted {} classes over {} features", classes.len(), d);

        self.fitted = Some(Fitted {
            classes,
            coef,
            intercept,
        });
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>, ClassifierError> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or(ClassifierError::NotFitted("linear_discriminant"))?;
        check_width(fitted.coef.nrows(), features)?;

        let scores = features.dot(&fitted.coef) + &fitted.intercept;
        Ok(scores
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (slot, &v) in row.iter().enumerate() {
                    if v > row[best] {
                        best = slot;
                    }
                }
                fitted.classes[best]
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_separates_gaussian_blobs() {
        let x = array![
            [1.0, 2.0],
            [1.5, 1.8],
            [0.8, 2.2],
            [1.2, 2.1],
            [5.0, 6.0],
            [5.3, 5.7],
            [4.8, 6.2],
            [5.1, 6.1]
        ];
        let data = Dataset::new(x, vec![0, 0, 0, 0, 1, 1, 1, 1], 2).unwrap();
        let mut lda = LinearDiscriminant::new(1e-6).unwrap();
        lda.fit(&data).unwrap();
        let pred = lda.predict(&array![[1.0, 2.0], [5.0, 6.0], [2.0, 2.5]]).unwrap();
        assert_eq!(pred, vec![0, 1, 0]);
    }

    #[test]
    fn test_two_samples_with_constant_features() {
        // One sample per class leaves zero within-class scatter
        let data = Dataset::new(array![[0.0, 7.0], [4.0, 7.0]], vec![0, 1], 2).unwrap();
        let mut lda = LinearDiscriminant::new(1e-6).unwrap();
        lda.fit(&data).unwrap();
        assert_eq!(lda.predict(&array![[0.5, 7.0], [3.5, 7.0]]).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_single_class() {
        let data = Dataset::new(array![[1.0], [2.0]], vec![2, 2], 3).unwrap();
        let mut lda = LinearDiscriminant::new(1e-6).unwrap();
        lda.fit(&data).unwrap();
        assert_eq!(lda.predict(&array![[100.0]]).unwrap(), vec![2]);
    }

    #[test]
    fn test_errors() {
        assert!(LinearDiscriminant::new(-1.0).is_err());
        let lda = LinearDiscriminant::new(0.0).unwrap();
        assert!(matches!(
            lda.predict(&array![[1.0]]),
            Err(ClassifierError::NotFitted(_))
        ));
    }
}
