//! Linear Support Vector Machine
//!
//! Soft-margin SVM trained by sequential minimal optimization on the dual
//! problem, combined one-vs-one for multi-class data.

use crate::{argmax, check_width, Classifier, ClassifierError, Dataset};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::{debug, warn};

const TAU: f64 = 1e-12;

/// Linear-kernel C-SVM with one-vs-one voting
#[derive(Debug, Clone)]
pub struct LinearSvm {
    c: f64,
    tolerance: f64,
    max_iter: usize,
    fitted: Option<Fitted>,
}

#[derive(Debug, Clone)]
struct Fitted {
    n_features: usize,
    n_classes: usize,
    classes: Vec<usize>,
    machines: Vec<BinaryMachine>,
}

/// Separating hyperplane between two classes; positive side is `positive`
#[derive(Debug, Clone)]
struct BinaryMachine {
    positive: usize,
    negative: usize,
    weights: Array1<f64>,
    rho: f64,
}

impl BinaryMachine {
    fn decision(&self, x: ArrayView1<'_, f64>) -> f64 {
        self.weights.dot(&x) - self.rho
    }
}

impl LinearSvm {
    pub fn new(c: f64, tolerance: f64, max_iter: usize) -> Result<Self, ClassifierError> {
        if !(c > 0.0 && c.is_finite()) {
            return Err(ClassifierError::InvalidHyperparameter(format!(
                "C must be positive, got {}",
                c
            )));
        }
        if !(tolerance > 0.0) {
            return Err(ClassifierError::InvalidHyperparameter(format!(
                "tolerance must be positive, got {}",
                tolerance
            )));
        }
        if max_iter == 0 {
            return Err(ClassifierError::InvalidHyperparameter(
                "max_iter must be at least 1".into(),
            ));
        }
        Ok(Self {
            c,
            tolerance,
            max_iter,
            fitted: None,
        })
    }

    /// Train one binary machine on the rows labelled `positive` or `negative`
    fn train_pair(&self, data: &Dataset, positive: usize, negative: usize) -> BinaryMachine {
        let rows: Vec<usize> = (0..data.n_samples())
            .filter(|&i| {
                let t = data.targets()[i];
                t == positive || t == negative
            })
            .collect();
        let y: Vec<f64> = rows
            .iter()
            .map(|&i| if data.targets()[i] == positive { 1.0 } else { -1.0 })
            .collect();
        let x = data.features().select(Axis(0), &rows);

        let (alpha, rho) = self.smo(&x, &y);

        let mut weights = Array1::zeros(x.ncols());
        for (k, row) in x.rows().into_iter().enumerate() {
            if alpha[k] > 0.0 {
                weights.scaled_add(alpha[k] * y[k], &row);
            }
        }
        BinaryMachine {
            positive,
            negative,
            weights,
            rho,
        }
    }

    /// Solve `min ½αᵀQα − eᵀα` s.t. `yᵀα = 0`, `0 ≤ α ≤ C`.
    ///
    /// Returns the multipliers and the bias term `rho`.
    fn smo(&self, x: &Array2<f64>, y: &[f64]) -> (Vec<f64>, f64) {
        let n = y.len();
        let c = self.c;
        let diag: Vec<f64> = x.rows().into_iter().map(|r| r.dot(&r)).collect();
        let mut alpha = vec![0.0; n];
        let mut grad = vec![-1.0; n];

        let q_row = |i: usize| -> Vec<f64> {
            let xi = x.row(i);
            x.rows()
                .into_iter()
                .enumerate()
                .map(|(k, xk)| y[i] * y[k] * xi.dot(&xk))
                .collect()
        };

        let mut iter = 0;
        loop {
            // Maximal violating pair
            let mut g_max = f64::NEG_INFINITY;
            let mut g_min = f64::INFINITY;
            let mut i_sel = None;
            let mut j_sel = None;
            for t in 0..n {
                let v = -y[t] * grad[t];
                let in_up = (y[t] > 0.0 && alpha[t] < c) || (y[t] < 0.0 && alpha[t] > 0.0);
                let in_low = (y[t] > 0.0 && alpha[t] > 0.0) || (y[t] < 0.0 && alpha[t] < c);
                if in_up && v > g_max {
                    g_max = v;
                    i_sel = Some(t);
                }
                if in_low && v < g_min {
                    g_min = v;
                    j_sel = Some(t);
                }
            }
            let (i, j) = match (i_sel, j_sel) {
                (Some(i), Some(j)) if g_max - g_min >= self.tolerance => (i, j),
                _ => break,
            };
            if iter >= self.max_iter {
                warn!(
                    "SMO stopped after {} iterations with violation {:.3e}",
                    iter,
                    g_max - g_min
                );
                break;
            }
            iter += 1;

            let qi = q_row(i);
            let qj = q_row(j);
            let (old_i, old_j) = (alpha[i], alpha[j]);

            if y[i] != y[j] {
                let quad = (diag[i] + diag[j] + 2.0 * qi[j]).max(TAU);
                let delta = (-grad[i] - grad[j]) / quad;
                let diff = alpha[i] - alpha[j];
                alpha[i] += delta;
                alpha[j] += delta;
                if diff > 0.0 {
                    if alpha[j] < 0.0 {
                        alpha[j] = 0.0;
                        alpha[i] = diff;
                    }
                } else if alpha[i] < 0.0 {
                    alpha[i] = 0.0;
                    alpha[j] = -diff;
                }
                if diff > 0.0 {
                    if alpha[i] > c {
                        alpha[i] = c;
                        alpha[j] = c - diff;
                    }
                } else if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = c + diff;
                }
            } else {
                let quad = (diag[i] + diag[j] - 2.0 * qi[j]).max(TAU);
                let delta = (grad[i] - grad[j]) / quad;
                let sum = alpha[i] + alpha[j];
                alpha[i] -= delta;
                alpha[j] += delta;
                if sum > c {
                    if alpha[i] > c {
                        alpha[i] = c;
                        alpha[j] = sum - c;
                    }
                    if alpha[j] > c {
                        alpha[j] = c;
                        alpha[i] = sum - c;
                    }
                } else {
                    if alpha[j] < 0.0 {
                        alpha[j] = 0.0;
                        alpha[i] = sum;
                    }
                    if alpha[i] < 0.0 {
                        alpha[i] = 0.0;
                        alpha[j] = sum;
                    }
                }
            }

            let (d_i, d_j) = (alpha[i] - old_i, alpha[j] - old_j);
            for k in 0..n {
                grad[k] += qi[k] * d_i + qj[k] * d_j;
            }
        }
        debug!("SMO converged in {} iterations over {} samples", iter, n);

        let rho = Self::rho(&alpha, &grad, y, c);
        (alpha, rho)
    }

    fn rho(alpha: &[f64], grad: &[f64], y: &[f64], c: f64) -> f64 {
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free_sum = 0.0;
        let mut free = 0usize;
        for k in 0..alpha.len() {
            let yg = y[k] * grad[k];
            if alpha[k] >= c {
                if y[k] < 0.0 {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else if alpha[k] <= 0.0 {
                if y[k] > 0.0 {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else {
                free += 1;
                free_sum += yg;
            }
        }
        if free > 0 {
            free_sum / free as f64
        } else if upper.is_finite() && lower.is_finite() {
            (upper + lower) / 2.0
        } else if upper.is_finite() {
            upper
        } else if lower.is_finite() {
            lower
        } else {
            0.0
        }
    }
}

impl Classifier for LinearSvm {
    fn kind(&self) -> &'static str {
        "linear_svm"
    }

    fn fit(&mut self, data: &Dataset) -> Result<(), ClassifierError> {
        if data.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        let classes = data.present_classes();
        let mut machines = Vec::new();
        for (a, &positive) in classes.iter().enumerate() {
            for &negative in &classes[a + 1..] {
                machines.push(self.train_pair(data, positive, negative));
            }
        }
        if classes.len() == 1 {
            warn!("Training data holds a single class; SVM will predict it for every sample");
        }
        self.fitted = Some(Fitted {
            n_features: data.n_features(),
            n_classes: data.n_classes(),
            classes,
            machines,
        });
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>, ClassifierError> {
        let fitted = self.fitted.as_ref().ok_or(ClassifierError::NotFitted("linear_svm"))?;
        check_width(fitted.n_features, features)?;

        Ok(features
            .rows()
            .into_iter()
            .map(|row| {
                if fitted.machines.is_empty() {
                    return fitted.classes[0];
                }
                let mut votes = vec![0.0; fitted.n_classes];
                for machine in &fitted.machines {
                    if machine.decision(row) > 0.0 {
                        votes[machine.positive] += 1.0;
                    } else {
                        votes[machine.negative] += 1.0;
                    }
                }
                argmax(&votes)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn svm() -> LinearSvm {
        LinearSvm::new(1.0, 1e-3, 100_000).unwrap()
    }

    #[test]
    fn test_two_point_margin() {
        // Maximum-margin hyperplane between (0,0) and (2,0) is x = 1
        let data = Dataset::new(array![[0.0, 0.0], [2.0, 0.0]], vec![0, 1], 2).unwrap();
        let mut model = svm();
        model.fit(&data).unwrap();
        let machine = &model.fitted.as_ref().unwrap().machines[0];
        assert!((machine.weights[0] + 1.0).abs() < 1e-6);
        assert!(machine.weights[1].abs() < 1e-9);
        assert!((machine.rho + 1.0).abs() < 1e-6);
        assert_eq!(model.predict(&array![[0.5, 3.0], [1.5, -3.0]]).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_three_class_one_vs_one() {
        let x = array![
            [0.0, 0.0],
            [0.5, 0.2],
            [10.0, 0.0],
            [10.5, 0.3],
            [0.0, 10.0],
            [0.2, 10.5]
        ];
        let data = Dataset::new(x, vec![0, 0, 1, 1, 2, 2], 3).unwrap();
        let mut model = svm();
        model.fit(&data).unwrap();
        assert_eq!(model.fitted.as_ref().unwrap().machines.len(), 3);
        let pred = model.predict(&array![[0.1, 0.1], [9.0, 1.0], [1.0, 9.0]]).unwrap();
        assert_eq!(pred, vec![0, 1, 2]);
    }

    #[test]
    fn test_single_class_predicts_it() {
        let data = Dataset::new(array![[1.0], [2.0]], vec![1, 1], 2).unwrap();
        let mut model = svm();
        model.fit(&data).unwrap();
        assert_eq!(model.predict(&array![[-5.0], [7.0]]).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_overlapping_classes_respect_box() {
        // No threshold separates these, so misclassified points sit at the bound
        let x = array![[0.0], [1.0], [0.5], [1.5], [0.8], [0.2]];
        let y = [1.0, -1.0, -1.0, 1.0, 1.0, -1.0];

        for c in [0.5, 0.01] {
            let model = LinearSvm::new(c, 1e-3, 10_000).unwrap();
            let (alpha, rho) = model.smo(&x, &y);

            assert!(
                alpha.iter().all(|&a| (0.0..=c).contains(&a)),
                "alpha {:?} outside [0, {}]",
                alpha,
                c
            );
            let balance: f64 = alpha.iter().zip(&y).map(|(a, y)| a * y).sum();
            assert!(balance.abs() < 1e-9, "sum of alpha*y = {}", balance);
            assert!(alpha.iter().any(|&a| a == c), "no multiplier reached C = {}", c);
            assert!(rho.is_finite());
        }
    }

    #[test]
    fn test_separable_pair_stays_inside_box() {
        let (alpha, _) = svm().smo(&array![[0.0, 0.0], [2.0, 0.0]], &[1.0, -1.0]);
        assert!((alpha[0] - 0.5).abs() < 1e-12);
        assert!((alpha[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(LinearSvm::new(0.0, 1e-3, 10).is_err());
        assert!(LinearSvm::new(1.0, 0.0, 10).is_err());
        assert!(LinearSvm::new(1.0, 1e-3, 0).is_err());
        assert!(matches!(
            svm().predict(&array![[1.0]]),
            Err(ClassifierError::NotFitted(_))
        ));
    }
}
