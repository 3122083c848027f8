//! Core matrix type

use std::fmt;
use matrixplay_core::{PlayError, Scalar, ScalarError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for matrix construction and algorithms
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("Incompatible dimensions: {0}")]
    DimensionMismatch(String),

    #[error("Matrix must be square, got {rows}×{columns}")]
    NotSquare { rows: usize, columns: usize },

    #[error("Matrix is singular")]
    SingularMatrix,

    #[error("Power must be an integer, got {0}")]
    NonIntegerPower(String),

    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(String),

    #[error(transparent)]
    Scalar(#[from] ScalarError),
}

/// Matrix of exact rational scalars
///
/// Always at least 1×1 with a rectangular grid. Treated as a value:
/// every transforming method borrows `self` and returns a new matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    rows: usize,
    columns: usize,
    data: Vec<Vec<Scalar>>,
}

/// Unvalidated wire form of a matrix
#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    columns: usize,
    data: Vec<Vec<Scalar>>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = MatrixError;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        Matrix::new(raw.rows, raw.columns, raw.data)
    }
}

impl Matrix {
    /// Create a matrix, checking the grid against the stated shape
    pub fn new(rows: usize, columns: usize, data: Vec<Vec<Scalar>>) -> Result<Self, MatrixError> {
        if rows == 0 || columns == 0 {
            return Err(MatrixError::DimensionMismatch(format!(
                "a matrix needs at least one row and one column, got {}×{}",
                rows, columns
            )));
        }

        if data.len() != rows {
            return Err(MatrixError::DimensionMismatch(format!(
                "expected {} rows, got {}",
                rows, data.len()
            )));
        }

        // Validate all rows have same length
        for (i, row) in data.iter().enumerate() {
            if row.len() != columns {
                return Err(MatrixError::DimensionMismatch(format!(
                    "row {} has {} columns, expected {}",
                    i, row.len(), columns
                )));
            }
        }

        Ok(Self { rows, columns, data })
    }

    /// Create from nested rows, taking the shape from the data
    pub fn from_rows(data: Vec<Vec<Scalar>>) -> Result<Self, MatrixError> {
        let rows = data.len();
        let columns = data.first().map_or(0, |row| row.len());
        Self::new(rows, columns, data)
    }

    /// Create from rows of integers
    pub fn from_integers(data: &[Vec<i64>]) -> Result<Self, MatrixError> {
        Self::from_rows(
            data.iter()
                .map(|row| row.iter().map(|&n| Scalar::from(n)).collect())
                .collect(),
        )
    }

    /// All-zero matrix
    pub fn zeros(rows: usize, columns: usize) -> Result<Self, MatrixError> {
        Self::new(rows, columns, vec![vec![Scalar::zero(); columns]; rows])
    }

    /// n×n identity
    pub fn identity(n: usize) -> Result<Self, MatrixError> {
        let data = (0..n)
            .map(|i| (0..n).map(|j| if i == j { Scalar::one() } else { Scalar::zero() }).collect())
            .collect();
        Self::new(n, n, data)
    }

    /// Build from a grid already known to be valid
    pub(crate) fn from_grid(data: Vec<Vec<Scalar>>) -> Self {
        let rows = data.len();
        let columns = data.first().map_or(0, |row| row.len());
        Self { rows, columns, data }
    }

    /// Get number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get number of columns
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Check if matrix is square
    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// Get element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<&Scalar> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    /// Get a row as a slice
    pub fn row(&self, row: usize) -> Option<&[Scalar]> {
        self.data.get(row).map(|r| r.as_slice())
    }

    /// Get a column as a vector
    pub fn column(&self, col: usize) -> Option<Vec<Scalar>> {
        if col >= self.columns {
            return None;
        }
        Some(self.data.iter().map(|row| row[col].clone()).collect())
    }

    /// Borrow the grid
    pub fn data(&self) -> &[Vec<Scalar>] {
        &self.data
    }

    /// Take the grid
    pub fn into_data(self) -> Vec<Vec<Scalar>> {
        self.data
    }

    /// Mutable grid, for working copies that have not been handed out yet
    pub(crate) fn data_mut(&mut self) -> &mut Vec<Vec<Scalar>> {
        &mut self.data
    }

    pub(crate) fn check_row(&self, row: usize) -> Result<(), MatrixError> {
        if row >= self.rows {
            return Err(MatrixError::IndexOutOfBounds(format!(
                "row {} in a matrix with {} rows",
                row, self.rows
            )));
        }
        Ok(())
    }

    pub(crate) fn check_column(&self, col: usize) -> Result<(), MatrixError> {
        if col >= self.columns {
            return Err(MatrixError::IndexOutOfBounds(format!(
                "column {} in a matrix with {} columns",
                col, self.columns
            )));
        }
        Ok(())
    }

    pub(crate) fn check_square(&self) -> Result<(), MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare { rows: self.rows, columns: self.columns });
        }
        Ok(())
    }
}

impl Default for Matrix {
    /// The 1×1 zero matrix, the smallest valid shape
    fn default() -> Self {
        Self::from_grid(vec![vec![Scalar::zero()]])
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (j, val) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", val)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

impl From<MatrixError> for PlayError {
    fn from(err: MatrixError) -> Self {
        match err {
            MatrixError::DimensionMismatch(s) => PlayError::dimension_mismatch(s),
            MatrixError::NotSquare { rows, columns } => PlayError::not_square(rows, columns),
            MatrixError::SingularMatrix => PlayError::singular_matrix(),
            MatrixError::NonIntegerPower(s) => PlayError::non_integer_power(s),
            MatrixError::IndexOutOfBounds(s) => PlayError::index_out_of_bounds(s),
            MatrixError::Scalar(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrixplay_core::codes;

    #[test]
    fn test_matrix_creation() {
        let m = Matrix::from_integers(&[vec![1, 2], vec![3, 4]]).unwrap();

        assert_eq!(m.rows(), 2);
        assert_eq!(m.columns(), 2);
        assert!(m.is_square());
    }

    #[test]
    fn test_matrix_get() {
        let m = Matrix::from_integers(&[vec![1, 2], vec![3, 4]]).unwrap();

        assert_eq!(m.get(0, 0), Some(&Scalar::from(1)));
        assert_eq!(m.get(1, 1), Some(&Scalar::from(4)));
        assert_eq!(m.get(2, 2), None);
        assert_eq!(m.column(1), Some(vec![Scalar::from(2), Scalar::from(4)]));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Matrix::from_integers(&[vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch(_)));
    }

    #[test]
    fn test_shape_must_match_data() {
        let data = vec![vec![Scalar::one(), Scalar::zero()]];
        assert!(matches!(Matrix::new(2, 2, data), Err(MatrixError::DimensionMismatch(_))));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(Matrix::zeros(0, 3).is_err());
        assert!(Matrix::identity(0).is_err());
        assert!(Matrix::from_rows(vec![]).is_err());
        assert!(Matrix::from_rows(vec![vec![]]).is_err());
    }

    #[test]
    fn test_identity() {
        let id = Matrix::identity(3).unwrap();
        assert_eq!(id, Matrix::from_integers(&[vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]]).unwrap());
    }

    #[test]
    fn test_default_is_smallest() {
        let m = Matrix::default();
        assert_eq!((m.rows(), m.columns()), (1, 1));
        assert!(m.get(0, 0).unwrap().is_zero());
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_rows(vec![
            vec![Scalar::from(1), Scalar::new(3, 2).unwrap()],
        ]).unwrap();
        assert_eq!(m.to_string(), "[[1, 3/2]]");
    }

    #[test]
    fn test_serde_validates_shape() {
        let m = Matrix::from_integers(&[vec![1, 2]]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"rows":1,"columns":2,"data":[["1","2"]]}"#);

        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);

        let bad = r#"{"rows":2,"columns":2,"data":[["1","2"]]}"#;
        assert!(serde_json::from_str::<Matrix>(bad).is_err());
    }

    #[test]
    fn test_error_conversion() {
        let err: PlayError = MatrixError::NotSquare { rows: 2, columns: 3 }.into();
        assert_eq!(err.code, codes::NOT_SQUARE);
        let err: PlayError = MatrixError::Scalar(ScalarError::DivisionByZero).into();
        assert_eq!(err.code, codes::DIV_ZERO);
    }
}
