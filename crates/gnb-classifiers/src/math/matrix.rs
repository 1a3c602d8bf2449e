use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row-major 2D array. Rows are samples, columns are attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Array2<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Array2<T> {
    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self, ShapeError> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(ShapeError::Buffer {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix from row vectors. Every row must have the length of the
    /// first one; ragged input is rejected rather than padded.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, ShapeError> {
        let nrows = rows.len();
        let ncols = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(nrows * ncols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != ncols {
                return Err(ShapeError::Ragged {
                    row,
                    expected: ncols,
                    found: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self {
            data,
            rows: nrows,
            cols: ncols,
        })
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |row| self.row_slice(row))
    }

    pub fn select_rows(&self, indices: &[usize]) -> Array2<T>
    where
        T: Clone,
    {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &row in indices {
            data.extend_from_slice(self.row_slice(row));
        }
        Array2 {
            data,
            rows: indices.len(),
            cols: self.cols,
        }
    }
}

impl<T: Clone> Array2<T> {
    pub fn from_elem(shape: (usize, usize), elem: T) -> Self {
        Self {
            data: vec![elem; shape.0 * shape.1],
            rows: shape.0,
            cols: shape.1,
        }
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// Flat buffer length does not match `rows * cols`.
    #[error("invalid shape ({rows}, {cols}) for buffer of length {len}")]
    Buffer { rows: usize, cols: usize, len: usize },
    /// A row differs in length from the first row.
    #[error("row {row} has {found} values, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}
