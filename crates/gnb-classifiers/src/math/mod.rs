//! Small dense matrix type used as the feature-matrix container.
//!
//! `Array2` is row-major and intentionally minimal; it carries just enough
//! API for fitting and scoring without pulling in a full ndarray stack.
pub mod matrix;

pub use matrix::{Array2, ShapeError};
