//! Feature Extraction Stage

use crate::PipelineError;
use feature_engine::{extract_all, ExtractionConfig, FeatureExtractor};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A feature table written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub split: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Extract every split under `root` and write `<output_dir>/<split>.csv`.
///
/// Tables are written in split order; an error leaves earlier files in place.
pub fn run_extraction(
    config: &ExtractionConfig,
    root: &Path,
    output_dir: &Path,
) -> Result<Vec<WrittenTable>, PipelineError> {
    let extractor = FeatureExtractor::new(config.clone())?;
    info!(
        "Extracting {} features from {} (masked={}, equalize={})",
        extractor.schema().width(),
        root.display(),
        config.masked,
        config.equalize
    );

    let tables = extract_all(&extractor, root)?;

    fs::create_dir_all(output_dir).map_err(|source| PipelineError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(tables.len());
    for (split, table) in tables {
        let path = output_dir.join(format!("{}.csv", split));
        table.write_csv(&path)?;
        written.push(WrittenTable {
            split,
            path,
            rows: table.len(),
        });
    }
    Ok(written)
}
