//! Workflows behind the `gnb` subcommands.
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use gnb_classifiers::data_handling::split_indices;
use gnb_classifiers::encoding::LabelEncoder;
use gnb_classifiers::math::Array2;
use gnb_classifiers::metrics::{accuracy_score, confusion_matrix};
use gnb_classifiers::models::{FittedGaussianNb, GaussianNb};

use crate::config::RunConfig;
use crate::load_data::{read_labeled, read_unlabeled, LabeledRows};

/// Outcome of fitting on training rows and scoring held-out rows.
#[derive(Debug)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
    /// Class labels indexed by class code.
    pub classes: Vec<String>,
    /// Rows are true classes, columns predicted classes.
    pub confusion: Array2<usize>,
}

impl EvaluationReport {
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy * 100.0
    }

    /// Tab-separated confusion matrix with class labels as headers.
    pub fn confusion_table(&self) -> String {
        let mut out = String::from("true\\pred");
        for class in &self.classes {
            out.push('\t');
            out.push_str(class);
        }
        for (class, row) in self.classes.iter().zip(self.confusion.rows()) {
            out.push('\n');
            out.push_str(class);
            for count in row {
                out.push('\t');
                out.push_str(&count.to_string());
            }
        }
        out
    }
}

/// Encode training labels and fit a model on them.
pub fn fit_rows(
    rows: LabeledRows,
    config: &RunConfig,
) -> Result<(FittedGaussianNb, LabelEncoder<String>)> {
    let (dataset, encoder) = rows.encode()?;
    dataset.log_summary();
    let model = GaussianNb::new(config.model.clone())
        .fit(&dataset.x, &dataset.y)
        .context("Failed to fit Gaussian Naive Bayes model")?;
    Ok((model, encoder))
}

/// Fit on `train_path` and score either `test_path` or a seeded hold-out
/// split of the training file.
pub fn evaluate(
    train_path: &Path,
    test_path: Option<&Path>,
    config: &RunConfig,
) -> Result<EvaluationReport> {
    let rows = read_labeled(train_path, config)?;
    let (train_rows, test_rows) = match test_path {
        Some(path) => (rows, read_labeled(path, config)?),
        None => {
            let (train_idx, test_idx) = split_indices(rows.len(), config.test_fraction, config.seed)
                .context("Failed to split training data")?;
            log::info!(
                "Holding out {} of {} rows (seed {})",
                test_idx.len(),
                rows.len(),
                config.seed
            );
            (rows.select(&train_idx), rows.select(&test_idx))
        }
    };

    let n_train = train_rows.len();
    let (model, encoder) = fit_rows(train_rows, config)?;
    let test = test_rows.encode_with(&encoder)?;

    let predictions = model
        .predict(&test.x)
        .context("Failed to predict test rows")?;
    let accuracy = accuracy_score(&predictions, &test.y)?;
    let confusion = confusion_matrix(&predictions, &test.y, model.n_classes())?;

    Ok(EvaluationReport {
        accuracy,
        n_train,
        n_test: test.len(),
        classes: encoder.classes().to_vec(),
        confusion,
    })
}

/// Fit on `train_path` and return the decoded class label of every row in
/// `input_path`.
pub fn predict_file(train_path: &Path, input_path: &Path, config: &RunConfig) -> Result<Vec<String>> {
    let (model, encoder) = fit_rows(read_labeled(train_path, config)?, config)?;
    let x = read_unlabeled(input_path, config)?;
    let predictions = model
        .predict(&x)
        .with_context(|| format!("Failed to predict rows of {}", input_path.display()))?;

    predictions
        .into_iter()
        .map(|code| {
            encoder
                .decode(code)
                .cloned()
                .with_context(|| format!("Predicted class code {} has no label", code))
        })
        .collect()
}

/// Write `row,label` records, one per prediction.
pub fn write_predictions<W: Write>(writer: W, labels: &[String]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["row", "label"])?;
    for (i, label) in labels.iter().enumerate() {
        writer.write_record([(i + 1).to_string().as_str(), label.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confusion_table_labels_rows_and_columns() {
        let report = EvaluationReport {
            accuracy: 0.75,
            n_train: 8,
            n_test: 4,
            classes: vec!["a".to_string(), "b".to_string()],
            confusion: Array2::from_shape_vec((2, 2), vec![2, 1, 0, 1]).unwrap(),
        };
        assert_eq!(report.accuracy_percent(), 75.0);
        assert_eq!(report.confusion_table(), "true\\pred\ta\tb\na\t2\t1\nb\t0\t1");
    }

    #[test]
    fn predictions_are_written_with_header() {
        let mut out = Vec::new();
        write_predictions(&mut out, &["x".to_string(), "y".to_string()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "row,label\n1,x\n2,y\n");
    }
}
