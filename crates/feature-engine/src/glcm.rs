//! Gray-Level Co-occurrence Matrix (GLCM) texture features
//!
//! Builds one symmetric, normalized co-occurrence matrix per
//! (distance, angle) pair over a whole image and averages the Haralick
//! contrast and correlation measures across all pairs.

use crate::config::GlcmConfig;
use crate::FeatureError;
use image::GrayImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Standard deviation below which correlation is treated as degenerate
const STD_EPSILON: f64 = 1e-15;

/// Texture summary averaged over every offset/angle combination
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlcmFeatures {
    /// Expected squared gray-level difference between co-occurring pixels
    pub contrast: f64,
    /// Linear dependency of co-occurring gray levels
    pub correlation: f64,
}

/// Symmetric normalized co-occurrence matrix for a single pixel offset
#[derive(Debug, Clone)]
pub struct GrayCooccurrence {
    matrix: Array2<f64>,
}

impl GrayCooccurrence {
    /// Build the matrix for `distance` pixels along `angle_deg`.
    ///
    /// The offset is `(round(sin θ·d), round(cos θ·d))` in (row, col). Pairs
    /// whose partner falls outside the image are not counted; if none remain
    /// the matrix stays all-zero.
    pub fn build(image: &GrayImage, distance: usize, angle_deg: f64, levels: usize) -> Self {
        let theta = angle_deg.to_radians();
        let d = distance as f64;
        let dr = (theta.sin() * d).round() as i64;
        let dc = (theta.cos() * d).round() as i64;

        let rows = image.height() as i64;
        let cols = image.width() as i64;
        let mut matrix = Array2::<f64>::zeros((levels, levels));

        let row_range = (-dr).max(0)..(rows - dr).min(rows);
        for r in row_range {
            for c in (-dc).max(0)..(cols - dc).min(cols) {
                let i = quantize(image.get_pixel(c as u32, r as u32).0[0], levels);
                let j = quantize(image.get_pixel((c + dc) as u32, (r + dr) as u32).0[0], levels);
                matrix[[i, j]] += 1.0;
                matrix[[j, i]] += 1.0;
            }
        }

        let total = matrix.sum();
        if total > 0.0 {
            matrix /= total;
        }
        trace!(distance, angle_deg, dr, dc, pairs = total / 2.0, "Built co-occurrence matrix");

        Self { matrix }
    }

    /// Normalized matrix, indexed `[i, j]`
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Σ P(i,j)·(i−j)²
    pub fn contrast(&self) -> f64 {
        self.matrix
            .indexed_iter()
            .filter(|(_, &p)| p > 0.0)
            .map(|((i, j), &p)| {
                let diff = i as f64 - j as f64;
                p * diff * diff
            })
            .sum()
    }

    /// Σ P(i,j)(i−μᵢ)(j−μⱼ) / (σᵢσⱼ), or 1.0 when either σ vanishes
    pub fn correlation(&self) -> f64 {
        let mut mu_i = 0.0;
        let mut mu_j = 0.0;
        for ((i, j), &p) in self.matrix.indexed_iter() {
            if p > 0.0 {
                mu_i += i as f64 * p;
                mu_j += j as f64 * p;
            }
        }

        let mut var_i = 0.0;
        let mut var_j = 0.0;
        let mut cov = 0.0;
        for ((i, j), &p) in self.matrix.indexed_iter() {
            if p > 0.0 {
                let di = i as f64 - mu_i;
                let dj = j as f64 - mu_j;
                var_i += p * di * di;
                var_j += p * dj * dj;
                cov += p * di * dj;
            }
        }

        let std_i = var_i.sqrt();
        let std_j = var_j.sqrt();
        if std_i < STD_EPSILON || std_j < STD_EPSILON {
            return 1.0;
        }
        cov / (std_i * std_j)
    }
}

/// Compute contrast and correlation averaged over every configured
/// (distance, angle) pair.
pub fn texture_features(image: &GrayImage, config: &GlcmConfig) -> Result<GlcmFeatures, FeatureError> {
    config.validate()?;

    let mut contrast = 0.0;
    let mut correlation = 0.0;
    for &angle in &config.angles_deg {
        for &distance in &config.distances {
            let glcm = GrayCooccurrence::build(image, distance, angle, config.levels);
            contrast += glcm.contrast();
            correlation += glcm.correlation();
        }
    }

    let n = config.combinations() as f64;
    Ok(GlcmFeatures {
        contrast: contrast / n,
        correlation: correlation / n,
    })
}

fn quantize(value: u8, levels: usize) -> usize {
    if levels == 256 {
        value as usize
    } else {
        (value as usize * levels) / 256
    }
}
