//! Accuracy Evaluation

use crate::{ClassifierConfig, ClassifierError, Dataset};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Fraction of positions where `predicted` equals `truth`.
///
/// Empty input scores 0.
pub fn accuracy(truth: &[usize], predicted: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / truth.len() as f64
}

/// Test accuracy per classifier, in evaluation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccuracyReport {
    entries: Vec<(String, f64)>,
}

impl AccuracyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, accuracy: f64) {
        self.entries.push((name.into(), accuracy));
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    /// Accuracy recorded under `name`
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, a)| *a)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write a `Classifier,Accuracy` CSV, one row per entry
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), ClassifierError> {
        let path = path.as_ref();
        let report_err = |source: csv::Error| ClassifierError::Report {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::Writer::from_path(path).map_err(report_err)?;
        writer.write_record(["Classifier", "Accuracy"]).map_err(report_err)?;
        for (name, acc) in &self.entries {
            writer
                .write_record([name.as_str(), format!("{:?}", acc).as_str()])
                .map_err(report_err)?;
        }
        writer.flush().map_err(|e| report_err(e.into()))?;

        info!("Wrote {} results to {}", self.entries.len(), path.display());
        Ok(())
    }
}

/// Fit every configured classifier on `train` and score it on `test`.
///
/// Stops at the first classifier that fails; nothing is reported for it.
pub fn evaluate(
    classifiers: &[ClassifierConfig],
    train: &Dataset,
    test: &Dataset,
) -> Result<AccuracyReport, ClassifierError> {
    if train.is_empty() {
        return Err(ClassifierError::EmptyTrainingSet);
    }
    if test.is_empty() {
        return Err(ClassifierError::EmptyTestSet);
    }

    let mut report = AccuracyReport::new();
    for config in classifiers {
        let start = Instant::now();
        let mut model = config.build()?;
        model.fit(train)?;
        let predicted = model.predict(test.features())?;
        let acc = accuracy(test.targets(), &predicted);

        debug!(
            "{} ({}) trained and scored in {:?}",
            config.name,
            model.kind(),
            start.elapsed()
        );
        info!("{} Accuracy: {}", config.name, acc);
        report.push(config.name.clone(), acc);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default_classifiers, ClassifierKind, KnnParams};
    use ndarray::array;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_accuracy_is_a_fraction(pairs in prop::collection::vec((0usize..4, 0usize..4), 1..64)) {
            let (truth, predicted): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
            let acc = accuracy(&truth, &predicted);
            prop_assert!((0.0..=1.0).contains(&acc));
            prop_assert_eq!(accuracy(&truth, &truth), 1.0);
        }
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
        assert_eq!(accuracy(&[2, 2], &[2, 2]), 1.0);
    }

    #[test]
    fn test_evaluate_defaults_on_separable_data() {
        let train = Dataset::new(
            array![[0.0, 0.0], [0.2, 0.1], [0.1, 0.3], [5.0, 5.0], [5.2, 4.9], [4.9, 5.1]],
            vec![0, 0, 0, 1, 1, 1],
            2,
        )
        .unwrap();
        let test = Dataset::new(array![[0.1, 0.1], [5.1, 5.0]], vec![0, 1], 2).unwrap();

        let report = evaluate(&default_classifiers(), &train, &test).unwrap();
        let names: Vec<_> = report.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["KNN", "Random Forest", "SVM", "LDA"]);
        for (name, acc) in report.entries() {
            assert_eq!(*acc, 1.0, "{} misclassified separable data", name);
        }
    }

    #[test]
    fn test_evaluate_propagates_build_error() {
        let train = Dataset::new(array![[0.0]], vec![0], 1).unwrap();
        let configs = vec![ClassifierConfig::new(
            "bad",
            ClassifierKind::Knn(KnnParams { n_neighbors: 0 }),
        )];
        assert!(evaluate(&configs, &train, &train).is_err());
    }

    #[test]
    fn test_empty_test_set() {
        let train = Dataset::new(array![[0.0]], vec![0], 1).unwrap();
        let test = Dataset::new(ndarray::Array2::zeros((0, 1)), vec![], 1).unwrap();
        assert!(matches!(
            evaluate(&default_classifiers(), &train, &test),
            Err(ClassifierError::EmptyTestSet)
        ));
    }

    #[test]
    fn test_report_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut report = AccuracyReport::new();
        report.push("KNN", 0.5);
        report.push("Random Forest", 1.0);
        report.write_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Classifier,Accuracy\nKNN,0.5\nRandom Forest,1.0\n");
        assert_eq!(report.get("KNN"), Some(0.5));
        assert_eq!(report.get("SVM"), None);
    }
}
