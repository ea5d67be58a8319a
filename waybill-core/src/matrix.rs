//! Caller-supplied travel-time matrix.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Square matrix of non-negative travel times between locations.
///
/// `rows[i][j]` is the travel time from location `i` to location `j`. The
/// matrix is stored exactly as supplied; [`TravelTimeMatrix::validate`]
/// checks its shape.
///
/// # Examples
/// ```
/// use waybill_core::TravelTimeMatrix;
///
/// let matrix = TravelTimeMatrix::new(vec![vec![0, 2], vec![2, 0]]);
/// assert!(matrix.validate().is_ok());
/// assert_eq!(matrix.travel_time(0, 1), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct TravelTimeMatrix {
    rows: Vec<Vec<u64>>,
}

/// Errors returned by [`TravelTimeMatrix::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// The matrix has no locations.
    #[error("travel-time matrix must contain at least one location")]
    Empty,
    /// A row length differs from the number of rows.
    #[error("row {row} has {len} columns but {expected} expected (matrix must be square)")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Columns found in that row.
        len: usize,
        /// Number of rows in the matrix.
        expected: usize,
    },
}

impl TravelTimeMatrix {
    /// Wrap raw rows without validation.
    #[must_use]
    pub const fn new(rows: Vec<Vec<u64>>) -> Self {
        Self { rows }
    }

    /// Check that the matrix is non-empty and square.
    pub fn validate(&self) -> Result<(), MatrixError> {
        if self.rows.is_empty() {
            return Err(MatrixError::Empty);
        }
        let expected = self.rows.len();
        for (row, entries) in self.rows.iter().enumerate() {
            if entries.len() != expected {
                return Err(MatrixError::NotSquare {
                    row,
                    len: entries.len(),
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Number of locations (rows).
    #[must_use]
    pub fn locations(&self) -> usize {
        self.rows.len()
    }

    /// Travel time between two locations, if both are in range.
    #[must_use]
    pub fn travel_time(&self, from: usize, to: usize) -> Option<u64> {
        self.rows.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Borrow the raw rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }
}

impl From<Vec<Vec<u64>>> for TravelTimeMatrix {
    fn from(rows: Vec<Vec<u64>>) -> Self {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_matrix_is_rejected() {
        let err = TravelTimeMatrix::default()
            .validate()
            .expect_err("empty matrix should fail");
        assert_eq!(err, MatrixError::Empty);
    }

    #[rstest]
    fn jagged_matrix_names_the_row() {
        let matrix = TravelTimeMatrix::new(vec![vec![0, 1], vec![1]]);
        let err = matrix.validate().expect_err("jagged matrix should fail");
        assert_eq!(
            err,
            MatrixError::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            }
        );
        assert!(err.to_string().contains("must be square"));
    }

    #[rstest]
    fn out_of_range_lookups_return_none() {
        let matrix = TravelTimeMatrix::new(vec![vec![0]]);
        assert_eq!(matrix.travel_time(0, 0), Some(0));
        assert_eq!(matrix.travel_time(0, 1), None);
    }
}
