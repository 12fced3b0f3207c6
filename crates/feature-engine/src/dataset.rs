//! Dataset Folder Walking
//!
//! Layout: `<root>/<split>/<class_label>/<image file>`. The class folder name
//! is used verbatim as the label.

use crate::features::FeatureExtractor;
use crate::FeatureError;
use feature_table::{FeatureTable, Record};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extract one labeled record per recognized image under `split_dir`.
///
/// Class folders and files are visited in file-name order. Files with other
/// extensions and non-directory entries at the class level are skipped; a
/// recognized file that fails to decode aborts the split.
pub fn extract_split(extractor: &FeatureExtractor, split_dir: &Path) -> Result<FeatureTable, FeatureError> {
    if !split_dir.is_dir() {
        return Err(FeatureError::MissingDirectory(split_dir.to_path_buf()));
    }

    let mut table = FeatureTable::new(extractor.schema());
    for class_dir in sorted_entries(split_dir)? {
        if !class_dir.is_dir() {
            debug!("Skipping non-directory {}", class_dir.display());
            continue;
        }
        let label = match class_dir.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                warn!("Skipping class folder with non UTF-8 name: {}", class_dir.display());
                continue;
            }
        };

        let mut count = 0usize;
        for file in sorted_entries(&class_dir)? {
            if !file.is_file() || !has_image_extension(extractor, &file) {
                debug!("Skipping {}", file.display());
                continue;
            }
            let features = extractor.extract_path(&file)?;
            table.push(Record::new(features.values(), label.clone()))?;
            count += 1;
        }
        info!("{}: {} images in class '{}'", split_dir.display(), count, label);
    }

    Ok(table)
}

/// Extract every configured split that exists under `root`.
///
/// Missing split folders are skipped with a warning; at least one must exist.
pub fn extract_all(extractor: &FeatureExtractor, root: &Path) -> Result<Vec<(String, FeatureTable)>, FeatureError> {
    if !root.is_dir() {
        return Err(FeatureError::MissingDirectory(root.to_path_buf()));
    }

    let splits = &extractor.config().splits;
    let mut tables = Vec::with_capacity(splits.len());
    for split in splits {
        let split_dir = root.join(split);
        if !split_dir.is_dir() {
            warn!("Split folder {} not found, skipping", split_dir.display());
            continue;
        }
        let table = extract_split(extractor, &split_dir)?;
        info!("Split '{}': {} records", split, table.len());
        tables.push((split.clone(), table));
    }

    if tables.is_empty() {
        return Err(FeatureError::NoSplits {
            root: root.to_path_buf(),
            splits: splits.join(", "),
        });
    }
    Ok(tables)
}

fn has_image_extension(extractor: &FeatureExtractor, path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extractor.config().accepts_extension(e))
        .unwrap_or(false)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, FeatureError> {
    let io_err = |source| FeatureError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort();
    Ok(entries)
}
