//! Feature Engineering Engine
//!
//! Texture (gray-level co-occurrence) and color feature extraction for
//! fruit imagery, with optional Otsu foreground masking.

mod color;
mod config;
mod dataset;
mod error;
mod features;
pub mod glcm;
mod mask;

pub use color::{average_channels, channel_count};
pub use config::{ColorMode, ExtractionConfig, GlcmConfig};
pub use dataset::{extract_all, extract_split};
pub use error::FeatureError;
pub use features::{FeatureExtractor, FeatureVector};
pub use glcm::{texture_features, GlcmFeatures, GrayCooccurrence};
pub use mask::{otsu_foreground, otsu_mask, MaskedImage};
