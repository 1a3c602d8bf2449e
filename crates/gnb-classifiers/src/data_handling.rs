//! Dataset bundle and seeded hold-out splitting.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{ClassifierError, Result};
use crate::math::Array2;

/// Feature matrix with its aligned 0-based class codes.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Vec<usize>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Vec<usize>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(ClassifierError::ShapeMismatch {
                context: "label vector length",
                expected: x.nrows(),
                found: y.len(),
            });
        }
        Ok(Dataset { x, y })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select_rows(indices),
            y: indices.iter().map(|&i| self.y[i]).collect(),
        }
    }

    pub fn log_summary(&self) {
        let n_classes = self.y.iter().copied().max().map_or(0, |m| m + 1);
        log::info!(
            "{} rows, {} attributes, {} classes",
            self.len(),
            self.x.ncols(),
            n_classes
        );
    }
}

/// Shuffle `0..n` with a seeded RNG and split off `test_fraction` of it,
/// returning `(train, test)` row indices.
///
/// Splitting happens on indices so callers can assign class codes from the
/// training half afterwards; shuffled training rows rarely keep a
/// first-appearance encoding. Either half being empty is an error.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ClassifierError::InvalidParameter(format!(
            "test_fraction must lie in (0, 1), got {}",
            test_fraction
        )));
    }
    let n_test = (n as f64 * test_fraction).round() as usize;
    if n_test == 0 || n_test == n {
        return Err(ClassifierError::InvalidParameter(format!(
            "test_fraction {} leaves an empty split for {} rows",
            test_fraction, n
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices.split_off(n - n_test);
    Ok((indices, test))
}
