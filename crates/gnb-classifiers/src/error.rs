use thiserror::Error;

use crate::math::ShapeError;

/// Input-validation and numerical failures raised by fit, predict and scoring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("shape mismatch in {context}: expected {expected}, found {found}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("class {class} has zero variance for attribute {attribute}")]
    DegenerateDistribution { class: usize, attribute: usize },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("invalid label encoding: {0}")]
    LabelEncoding(String),

    #[error("non-finite value at row {row}, column {col}")]
    NonFiniteValue { row: usize, col: usize },

    #[error("log-likelihood underflow for row {row}")]
    NumericalUnderflow { row: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<ShapeError> for ClassifierError {
    fn from(err: ShapeError) -> Self {
        match err {
            ShapeError::Buffer { rows, cols, len } => ClassifierError::ShapeMismatch {
                context: "matrix buffer",
                expected: rows * cols,
                found: len,
            },
            ShapeError::Ragged {
                expected, found, ..
            } => ClassifierError::ShapeMismatch {
                context: "feature row length",
                expected,
                found,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
