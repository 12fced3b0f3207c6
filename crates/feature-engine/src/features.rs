//! Feature Vector Assembly

use crate::color::average_channels;
use crate::config::ExtractionConfig;
use crate::glcm::{texture_features, GlcmFeatures};
use crate::mask::otsu_mask;
use crate::FeatureError;
use feature_table::FeatureSchema;
use image::DynamicImage;
use imageproc::contrast::equalize_histogram;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Per-image descriptor: GLCM texture followed by color averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Texture portion
    pub texture: GlcmFeatures,
    /// Channel averages (3 for RGB, 1 for intensity)
    pub color: Vec<f64>,
}

impl FeatureVector {
    /// Flatten into schema column order
    pub fn values(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(2 + self.color.len());
        values.push(self.texture.contrast);
        values.push(self.texture.correlation);
        values.extend_from_slice(&self.color);
        values
    }
}

/// Computes feature vectors for single images
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractionConfig,
}

impl FeatureExtractor {
    /// Create an extractor, validating the GLCM parameters
    pub fn new(config: ExtractionConfig) -> Result<Self, FeatureError> {
        config.glcm.validate()?;
        if config.extensions.is_empty() {
            return Err(FeatureError::Config("no image extensions configured".into()));
        }
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Output columns matching `FeatureVector::values`
    pub fn schema(&self) -> FeatureSchema {
        self.config.schema()
    }

    /// Compute the descriptor for a decoded image
    pub fn extract(&self, image: &DynamicImage) -> Result<FeatureVector, FeatureError> {
        let masked;
        let source = if self.config.masked {
            masked = otsu_mask(image);
            &masked.image
        } else {
            image
        };

        let mut gray = source.to_luma8();
        if self.config.equalize {
            gray = equalize_histogram(&gray);
        }

        let texture = texture_features(&gray, &self.config.glcm)?;
        let color = average_channels(source, self.config.color);

        Ok(FeatureVector { texture, color })
    }

    /// Decode an image file and compute its descriptor
    pub fn extract_path(&self, path: &Path) -> Result<FeatureVector, FeatureError> {
        let image = image::open(path).map_err(|source| FeatureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let features = self.extract(&image)?;
        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            contrast = features.texture.contrast,
            correlation = features.texture.correlation,
            "Extracted features"
        );
        Ok(features)
    }
}
