//! Classifier Training Stage

use crate::{PipelineError, TrainingConfig};
use classifiers::{evaluate, prepare_splits, AccuracyReport};
use feature_table::FeatureTable;
use tracing::info;

/// Train every configured classifier and write the results table.
///
/// The test table must share the training table's columns, and every test
/// label must appear in training. The results file is written only once all
/// classifiers have been scored.
pub fn run_training(config: &TrainingConfig) -> Result<AccuracyReport, PipelineError> {
    let train = FeatureTable::read_csv(&config.train_path, None)?;
    let test = FeatureTable::read_csv(&config.test_path, Some(train.schema()))?;
    info!(
        "Loaded {} training and {} test rows with columns {:?}",
        train.len(),
        test.len(),
        train.schema().columns()
    );

    let splits = prepare_splits(&train, &test)?;
    info!("Classes: {:?}", splits.encoder.classes());

    let report = evaluate(&config.classifiers, &splits.train, &splits.test)?;
    report.write_csv(&config.results_path)?;
    Ok(report)
}
