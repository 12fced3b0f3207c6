//! Extraction and training over a tiny synthetic dataset

use classifiers::ClassifierError;
use feature_engine::ExtractionConfig;
use feature_table::{FeatureSchema, FeatureTable, TableError};
use image::{Rgb, RgbImage};
use pipeline::{run_extraction, run_training, PipelineError, TrainingConfig};
use std::fs;
use std::path::Path;

fn solid(path: &Path, value: u8) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_pixel(2, 2, Rgb([value, value, value]))
        .save(path)
        .unwrap();
}

fn dataset(root: &Path, test_labels: [&str; 2]) {
    solid(&root.join("train/ripe/a.jpg"), 200);
    solid(&root.join("train/raw/b.jpg"), 40);
    solid(&root.join(format!("test/{}/c.jpg", test_labels[0])), 190);
    solid(&root.join(format!("test/{}/d.jpg", test_labels[1])), 50);
}

fn training_config(dir: &Path) -> TrainingConfig {
    TrainingConfig {
        train_path: dir.join("train.csv"),
        test_path: dir.join("test.csv"),
        results_path: dir.join("results.csv"),
        ..Default::default()
    }
}

#[test]
fn test_extract_then_train() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    let out = dir.path().join("features");
    dataset(&root, ["ripe", "raw"]);

    let written = run_extraction(&ExtractionConfig::default(), &root, &out).unwrap();
    let splits: Vec<_> = written.iter().map(|w| w.split.as_str()).collect();
    assert_eq!(splits, vec!["train", "test"]);
    assert!(written.iter().all(|w| w.rows == 2));
    assert!(!out.join("val.csv").exists());

    let train = FeatureTable::read_csv(out.join("train.csv"), Some(&FeatureSchema::rgb())).unwrap();
    let test = FeatureTable::read_csv(out.join("test.csv"), Some(&FeatureSchema::rgb())).unwrap();
    assert_eq!(train.len(), 2);
    assert_eq!(test.len(), 2);
    assert_eq!(train.schema(), test.schema());
    // Class folders are visited in name order
    assert_eq!(train.labels(), vec!["raw", "ripe"]);

    let report = run_training(&training_config(&out)).unwrap();
    assert_eq!(report.len(), 4);
    assert!(report.entries().iter().all(|(_, acc)| (0.0..=1.0).contains(acc)));

    let text = fs::read_to_string(out.join("results.csv")).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "Classifier,Accuracy");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("KNN,"));
    assert!(lines[4].starts_with("LDA,"));
}

#[test]
fn test_masked_extraction_schema() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    dataset(&root, ["ripe", "raw"]);

    run_extraction(&ExtractionConfig::masked(), &root, dir.path()).unwrap();
    let header = fs::read_to_string(dir.path().join("train.csv")).unwrap();
    assert!(header.starts_with("Contrast,Correlation,Avg_Intensity,Label\n"));
}

#[test]
fn test_unseen_test_label_aborts_without_results() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    dataset(&root, ["ripe", "defective"]);
    run_extraction(&ExtractionConfig::default(), &root, dir.path()).unwrap();

    let config = training_config(dir.path());
    match run_training(&config) {
        Err(PipelineError::Training(ClassifierError::Table(TableError::UnknownLabel(label)))) => {
            assert_eq!(label, "defective")
        }
        other => panic!("expected UnknownLabel, got {:?}", other),
    }
    assert!(!config.results_path.exists());
}

#[test]
fn test_missing_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = run_extraction(
        &ExtractionConfig::default(),
        &dir.path().join("absent"),
        dir.path(),
    );
    assert!(matches!(result, Err(PipelineError::Extraction(_))));
}
