//! Scoring helpers comparing predicted and true class codes.
use crate::error::{ClassifierError, Result};
use crate::math::Array2;

fn check_lengths(predictions: &[usize], y: &[usize]) -> Result<()> {
    if predictions.len() != y.len() {
        return Err(ClassifierError::ShapeMismatch {
            context: "prediction vector length",
            expected: y.len(),
            found: predictions.len(),
        });
    }
    if y.is_empty() {
        return Err(ClassifierError::EmptyInput("scoring requires at least one prediction"));
    }
    Ok(())
}

/// Fraction of rows whose predicted class code equals the true code.
pub fn accuracy_score(predictions: &[usize], y: &[usize]) -> Result<f64> {
    check_lengths(predictions, y)?;
    let correct = predictions
        .iter()
        .zip(y)
        .filter(|(p, t)| p == t)
        .count();
    Ok(correct as f64 / y.len() as f64)
}

/// Counts with rows indexed by true class and columns by predicted class.
pub fn confusion_matrix(
    predictions: &[usize],
    y: &[usize],
    n_classes: usize,
) -> Result<Array2<usize>> {
    check_lengths(predictions, y)?;
    let mut matrix = Array2::from_elem((n_classes, n_classes), 0usize);
    for (&predicted, &truth) in predictions.iter().zip(y) {
        let code = predicted.max(truth);
        if code >= n_classes {
            return Err(ClassifierError::LabelEncoding(format!(
                "class code {} outside 0..{}",
                code, n_classes
            )));
        }
        matrix[(truth, predicted)] += 1;
    }
    Ok(matrix)
}
