//! Delimited-file reader for labeled and unlabeled feature rows.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use gnb_classifiers::data_handling::Dataset;
use gnb_classifiers::encoding::LabelEncoder;
use gnb_classifiers::math::Array2;

use crate::config::RunConfig;

/// Feature rows with their textual class labels.
#[derive(Debug, Clone)]
pub struct LabeledRows {
    pub x: Array2<f64>,
    pub labels: Vec<String>,
}

impl LabeledRows {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn select(&self, indices: &[usize]) -> LabeledRows {
        LabeledRows {
            x: self.x.select_rows(indices),
            labels: indices.iter().map(|&i| self.labels[i].clone()).collect(),
        }
    }

    /// Encode labels in first-appearance order.
    pub fn encode(self) -> Result<(Dataset, LabelEncoder<String>)> {
        let (encoder, y) = LabelEncoder::fit(&self.labels);
        let dataset = Dataset::new(self.x, y)?;
        Ok((dataset, encoder))
    }

    /// Encode labels with a table learned from training data.
    pub fn encode_with(self, encoder: &LabelEncoder<String>) -> Result<Dataset> {
        let y = encoder
            .transform(&self.labels)
            .context("Test data contains a class absent from training data")?;
        Ok(Dataset::new(self.x, y)?)
    }
}

fn open_reader<P: AsRef<Path>>(path: P, config: &RunConfig) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .has_headers(config.has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .with_context(|| format!("Failed to open data file: {}", path.as_ref().display()))
}

fn parse_features<'a, I>(fields: I, row: usize) -> Result<Vec<f64>>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    fields
        .map(|(col, field)| {
            field.parse::<f64>().with_context(|| {
                format!("Invalid numeric value '{}' at row {}, column {}", field, row, col + 1)
            })
        })
        .collect()
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|f| f.is_empty())
}

/// Read rows whose label sits in `config.label_column` (default: last column).
pub fn read_labeled<P: AsRef<Path>>(path: P, config: &RunConfig) -> Result<LabeledRows> {
    let mut reader = open_reader(&path, config)?;
    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record = result.with_context(|| format!("Failed to read row {}", row))?;
        if is_blank(&record) {
            continue;
        }
        if record.len() < 2 {
            return Err(anyhow!("Row {} needs at least one feature and a label", row));
        }
        let label_idx = config.label_column.unwrap_or(record.len() - 1);
        let label = record
            .get(label_idx)
            .ok_or_else(|| anyhow!("Missing label column {} at row {}", label_idx + 1, row))?;

        let features = record
            .iter()
            .enumerate()
            .filter(|(col, _)| *col != label_idx);
        rows.push(parse_features(features, row)?);
        labels.push(label.to_string());
    }

    let x = Array2::from_rows(rows)
        .with_context(|| format!("Ragged feature rows in {}", path.as_ref().display()))?;
    log::debug!(
        "read {} labeled rows with {} attributes from {}",
        x.nrows(),
        x.ncols(),
        path.as_ref().display()
    );
    Ok(LabeledRows { x, labels })
}

/// Read rows made only of feature columns.
pub fn read_unlabeled<P: AsRef<Path>>(path: P, config: &RunConfig) -> Result<Array2<f64>> {
    let mut reader = open_reader(&path, config)?;
    let mut rows = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record = result.with_context(|| format!("Failed to read row {}", row))?;
        if is_blank(&record) {
            continue;
        }
        rows.push(parse_features(record.iter().enumerate(), row)?);
    }

    Array2::from_rows(rows)
        .with_context(|| format!("Ragged feature rows in {}", path.as_ref().display()))
}
