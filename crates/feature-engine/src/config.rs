//! Feature extraction configuration

use crate::FeatureError;
use feature_table::FeatureSchema;
use serde::{Deserialize, Serialize};

/// Which color averages go into the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Mean of red, green and blue channels
    Rgb,
    /// Mean of the single luma channel
    Intensity,
}

/// Co-occurrence matrix parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlcmConfig {
    /// Pixel pair distances
    pub distances: Vec<usize>,
    /// Pixel pair angles in degrees
    pub angles_deg: Vec<f64>,
    /// Number of gray levels (at most 256)
    pub levels: usize,
}

impl Default for GlcmConfig {
    fn default() -> Self {
        Self {
            distances: vec![1, 2, 3],
            angles_deg: vec![0.0, 45.0, 90.0, 135.0],
            levels: 256,
        }
    }
}

impl GlcmConfig {
    /// Reject parameter sets that cannot produce a matrix
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.distances.is_empty() {
            return Err(FeatureError::Config("at least one GLCM distance is required".into()));
        }
        if self.distances.contains(&0) {
            return Err(FeatureError::Config("GLCM distances must be >= 1".into()));
        }
        if self.angles_deg.is_empty() {
            return Err(FeatureError::Config("at least one GLCM angle is required".into()));
        }
        if !(2..=256).contains(&self.levels) {
            return Err(FeatureError::Config(format!(
                "GLCM levels must be in 2..=256, got {}",
                self.levels
            )));
        }
        Ok(())
    }

    /// Number of (distance, angle) combinations averaged per feature
    pub fn combinations(&self) -> usize {
        self.distances.len() * self.angles_deg.len()
    }
}

/// Feature extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Co-occurrence parameters
    pub glcm: GlcmConfig,

    /// Zero out background pixels using an Otsu threshold first
    pub masked: bool,

    /// Color averages emitted after the texture features
    pub color: ColorMode,

    /// Equalize the intensity histogram before building the GLCM
    pub equalize: bool,

    /// Recognized image file extensions (case-insensitive)
    pub extensions: Vec<String>,

    /// Split folders to process under the dataset root
    pub splits: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            glcm: GlcmConfig::default(),
            masked: false,
            color: ColorMode::Rgb,
            equalize: false,
            extensions: vec!["jpg".into(), "png".into()],
            splits: vec!["train".into(), "val".into(), "test".into()],
        }
    }
}

impl ExtractionConfig {
    /// Otsu-masked preset emitting a single intensity average
    pub fn masked() -> Self {
        Self {
            masked: true,
            color: ColorMode::Intensity,
            ..Default::default()
        }
    }

    /// Output columns for this configuration
    pub fn schema(&self) -> FeatureSchema {
        match self.color {
            ColorMode::Rgb => FeatureSchema::rgb(),
            ColorMode::Intensity => FeatureSchema::intensity(),
        }
    }

    /// Whether `ext` is one of the recognized image extensions
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_glcm_has_twelve_combinations() {
        let config = GlcmConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.combinations(), 12);
    }

    #[test]
    fn test_invalid_glcm_configs() {
        let zero = GlcmConfig { distances: vec![0, 1], ..Default::default() };
        assert!(zero.validate().is_err());

        let no_angles = GlcmConfig { angles_deg: vec![], ..Default::default() };
        assert!(no_angles.validate().is_err());

        let levels = GlcmConfig { levels: 512, ..Default::default() };
        assert!(levels.validate().is_err());
    }

    #[test]
    fn test_masked_preset_uses_intensity_schema() {
        let config = ExtractionConfig::masked();
        assert!(config.masked);
        assert_eq!(config.schema(), FeatureSchema::intensity());
        assert_eq!(ExtractionConfig::default().schema(), FeatureSchema::rgb());
    }

    #[test]
    fn test_extension_matching_ignores_case() {
        let config = ExtractionConfig::default();
        assert!(config.accepts_extension("JPG"));
        assert!(config.accepts_extension("png"));
        assert!(!config.accepts_extension("txt"));
    }
}
