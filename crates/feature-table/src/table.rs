//! Feature Table CSV Persistence

use crate::error::{Result, TableError};
use crate::schema::{FeatureSchema, LABEL_COLUMN};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// One labeled example: a feature vector plus its class label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Feature values in schema order
    pub features: Vec<f64>,
    /// Class label (the image's folder name)
    pub label: String,
}

impl Record {
    /// Create a new record
    pub fn new(features: Vec<f64>, label: impl Into<String>) -> Self {
        Self {
            features,
            label: label.into(),
        }
    }
}

/// An ordered sequence of records sharing one schema
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    schema: FeatureSchema,
    records: Vec<Record>,
}

impl FeatureTable {
    /// Create an empty table
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Build a table from records, checking every record's width
    pub fn from_records(schema: FeatureSchema, records: Vec<Record>) -> Result<Self> {
        let mut table = Self::new(schema);
        for record in records {
            table.push(record)?;
        }
        Ok(table)
    }

    /// Append a record
    pub fn push(&mut self, record: Record) -> Result<()> {
        if record.features.len() != self.schema.width() {
            return Err(TableError::RecordWidth {
                index: self.records.len(),
                expected: self.schema.width(),
                found: record.features.len(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Table schema
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Records in insertion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Label column in row order
    pub fn labels(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.label.as_str()).collect()
    }

    /// Feature rows in row order
    pub fn feature_rows(&self) -> Vec<&[f64]> {
        self.records.iter().map(|r| r.features.as_slice()).collect()
    }

    /// Write the table as CSV with a header row
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let csv_err = |source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(csv_err)?;

        writer.write_record(self.schema.header()).map_err(csv_err)?;
        for record in &self.records {
            // `{:?}` keeps the decimal point on whole numbers (`300.0`)
            let mut row: Vec<String> = record.features.iter().map(|v| format!("{:?}", v)).collect();
            row.push(record.label.clone());
            writer.write_record(&row).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Wrote {} rows to {}", self.records.len(), path.display());
        Ok(())
    }

    /// Read a CSV table.
    ///
    /// The header must end with the `Label` column. When `expected` is given the
    /// feature columns must match it exactly, in order. Labels are kept verbatim;
    /// feature cells may carry surrounding spaces but must be finite numbers.
    pub fn read_csv(path: impl AsRef<Path>, expected: Option<&FeatureSchema>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(TableError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }
        let csv_err = |source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_path(path)
            .map_err(csv_err)?;

        let headers = reader.headers().map_err(csv_err)?.clone();
        let schema = schema_from_header(path, &headers)?;
        if let Some(expected) = expected {
            expected.ensure_matches(&schema)?;
        }

        let width = schema.width();
        let mut table = Self::new(schema);
        for (idx, row) in reader.records().enumerate() {
            let row = row.map_err(csv_err)?;
            let row_num = idx + 1;
            if row.len() != width + 1 {
                return Err(TableError::RowWidth {
                    path: path.to_path_buf(),
                    row: row_num,
                    expected: width + 1,
                    found: row.len(),
                });
            }

            let features = row
                .iter()
                .take(width)
                .zip(headers.iter())
                .map(|(cell, column)| {
                    let value = cell.trim().parse::<f64>().map_err(|_| TableError::Parse {
                        path: path.to_path_buf(),
                        row: row_num,
                        column: column.to_string(),
                        value: cell.to_string(),
                    })?;
                    if !value.is_finite() {
                        return Err(TableError::NonFinite {
                            path: path.to_path_buf(),
                            row: row_num,
                            column: column.to_string(),
                            value: cell.to_string(),
                        });
                    }
                    Ok(value)
                })
                .collect::<Result<Vec<f64>>>()?;
            let label = row.get(width).unwrap_or_default().to_string();
            table.push(Record { features, label })?;
        }

        debug!("Read {} rows from {}", table.len(), path.display());
        Ok(table)
    }
}

fn schema_from_header(path: &Path, headers: &StringRecord) -> Result<FeatureSchema> {
    let columns: Vec<&str> = headers.iter().collect();
    match columns.split_last() {
        Some((&last, features)) if last == LABEL_COLUMN => {
            if features.is_empty() {
                Err(TableError::NoFeatureColumns {
                    path: path.to_path_buf(),
                })
            } else {
                Ok(FeatureSchema::new(features.iter().copied()))
            }
        }
        _ => Err(TableError::MissingLabelColumn {
            path: path.to_path_buf(),
            expected: LABEL_COLUMN,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_table() -> FeatureTable {
        FeatureTable::from_records(
            FeatureSchema::rgb(),
            vec![
                Record::new(vec![12.5, 0.93, 101.0, 87.25, 40.125], "ripe"),
                Record::new(vec![0.1 + 0.2, 1.0 / 3.0, 0.0, 255.0, 1e-9], "raw"),
                Record::new(vec![3.0, -0.5, 10.0, 20.0, 30.0], "defective"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_preserves_values_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        let table = sample_table();

        table.write_csv(&path).unwrap();
        let loaded = FeatureTable::read_csv(&path, Some(&FeatureSchema::rgb())).unwrap();

        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.labels(), vec!["ripe", "raw", "defective"]);
        for (a, b) in table.records().iter().zip(loaded.records()) {
            for (x, y) in a.features.iter().zip(&b.features) {
                assert!((x - y).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_header_written_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        sample_table().write_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "Contrast,Correlation,Avg_Red,Avg_Green,Avg_Blue,Label"
        );
    }

    #[test]
    fn test_schema_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        sample_table().write_csv(&path).unwrap();
        let err = FeatureTable::read_csv(&path, Some(&FeatureSchema::intensity())).unwrap_err();
        assert!(matches!(err, TableError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_missing_label_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Contrast,Correlation").unwrap();
        writeln!(file, "1.0,2.0").unwrap();
        drop(file);

        let err = FeatureTable::read_csv(&path, None).unwrap_err();
        assert!(matches!(err, TableError::MissingLabelColumn { .. }));
    }

    #[test]
    fn test_non_numeric_cell_reports_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "Contrast,Correlation,Label\n1.0,abc,ripe\n").unwrap();

        match FeatureTable::read_csv(&path, None) {
            Err(TableError::Parse { row, column, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "Correlation");
            }
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_labels_keep_surrounding_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let table = FeatureTable::from_records(
            FeatureSchema::new(["Contrast"]),
            vec![Record::new(vec![1.0], " ripe "), Record::new(vec![2.0], "raw\t")],
        )
        .unwrap();

        table.write_csv(&path).unwrap();
        let loaded = FeatureTable::read_csv(&path, None).unwrap();
        assert_eq!(loaded.labels(), table.labels());
        assert_eq!(loaded.labels(), vec![" ripe ", "raw\t"]);
    }

    #[test]
    fn test_feature_cells_tolerate_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "Contrast, Label\n 1.5 ,ripe\n").unwrap();
        let loaded = FeatureTable::read_csv(&path, None).unwrap();
        assert_eq!(loaded.records()[0].features, vec![1.5]);
        assert_eq!(loaded.labels(), vec!["ripe"]);
    }

    #[test]
    fn test_non_finite_cells_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            ("nan.csv", "Contrast,Label\nNaN,a\n"),
            ("inf.csv", "Contrast,Label\n1.0,a\ninf,b\n"),
        ];
        for (name, body) in cases {
            let path = dir.path().join(name);
            std::fs::write(&path, body).unwrap();
            match FeatureTable::read_csv(&path, None) {
                Err(TableError::NonFinite { column, .. }) => assert_eq!(column, "Contrast"),
                other => panic!("expected NonFinite error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_whole_numbers_keep_decimal_point() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let table = FeatureTable::from_records(
            FeatureSchema::new(["Contrast"]),
            vec![Record::new(vec![300.0], "ripe")],
        )
        .unwrap();
        table.write_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Contrast,Label\n300.0,ripe\n");
    }

    #[test]
    fn test_missing_file() {
        let err = FeatureTable::read_csv("/nonexistent/train.csv", None).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn test_push_rejects_wrong_width() {
        let mut table = FeatureTable::new(FeatureSchema::intensity());
        assert!(table.push(Record::new(vec![1.0, 2.0], "ripe")).is_err());
        assert!(table.push(Record::new(vec![1.0, 2.0, 3.0], "ripe")).is_ok());
    }
}
