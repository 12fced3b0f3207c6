//! Small dense linear solves

use ndarray::Array2;

/// Solve `A·X = B` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when a pivot is numerically zero.
pub(crate) fn solve(a: &Array2<f64>, b: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    debug_assert_eq!(a.ncols(), n);
    debug_assert_eq!(b.nrows(), n);

    let mut a = a.clone();
    let mut x = b.clone();
    let m = x.ncols();

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;
        if a[[pivot, col]].abs() < f64::MIN_POSITIVE {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap([col, k], [pivot, k]);
            }
            for k in 0..m {
                x.swap([col, k], [pivot, k]);
            }
        }

        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            for k in 0..m {
                x[[row, k]] -= factor * x[[col, k]];
            }
        }
    }

    for col in (0..n).rev() {
        for k in 0..m {
            let mut sum = x[[col, k]];
            for j in col + 1..n {
                sum -= a[[col, j]] * x[[j, k]];
            }
            x[[col, k]] = sum / a[[col, col]];
        }
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_solves_system_needing_pivot() {
        let a = array![[0.0, 2.0], [3.0, 1.0]];
        let b = array![[4.0], [5.0]];
        let x = solve(&a, &b).unwrap();
        assert!((x[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((x[[1, 0]] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_matrix() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let b = array![[1.0], [2.0]];
        assert!(solve(&a, &b).is_none());
    }
}
