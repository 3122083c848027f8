//! Matrix operations: access, arithmetic, transformations

use matrixplay_core::Scalar;
use crate::types::{Matrix, MatrixError};

/// Largest exponent magnitude accepted by `power`
pub const MAX_POWER: i64 = 1 << 16;

impl Matrix {
    // ============ set ============

    /// Copy of the matrix with one cell replaced
    pub fn set(&self, row: usize, col: usize, value: Scalar) -> Result<Matrix, MatrixError> {
        self.check_row(row)?;
        self.check_column(col)?;

        let mut copy = self.clone();
        copy.data_mut()[row][col] = value;
        Ok(copy)
    }

    // ============ sub_matrix ============

    /// Matrix with `row` and `col` removed (the minor used by cofactors)
    pub fn sub_matrix(&self, row: usize, col: usize) -> Result<Matrix, MatrixError> {
        self.check_row(row)?;
        self.check_column(col)?;

        let data: Vec<Vec<Scalar>> = self.data().iter()
            .enumerate()
            .filter(|(i, _)| *i != row)
            .map(|(_, r)| {
                r.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != col)
                    .map(|(_, cell)| cell.clone())
                    .collect()
            })
            .collect();

        Matrix::from_rows(data)
    }

    // ============ transpose ============

    pub fn transpose(&self) -> Matrix {
        let data: Vec<Vec<Scalar>> = (0..self.columns())
            .map(|j| self.data().iter().map(|row| row[j].clone()).collect())
            .collect();
        Matrix::from_grid(data)
    }

    // ============ multiply ============

    /// Standard matrix product `self × other`
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.columns() != other.rows() {
            return Err(MatrixError::DimensionMismatch(format!(
                "cannot multiply {}×{} by {}×{}",
                self.rows(), self.columns(), other.rows(), other.columns()
            )));
        }

        let data: Vec<Vec<Scalar>> = self.data().iter()
            .map(|row| {
                (0..other.columns())
                    .map(|j| {
                        row.iter()
                            .zip(other.data().iter())
                            .fold(Scalar::zero(), |acc, (cell, other_row)| acc.add(&cell.mul(&other_row[j])))
                    })
                    .collect()
            })
            .collect();

        Ok(Matrix::from_grid(data))
    }

    // ============ scale ============

    /// Multiply every cell by a scalar
    pub fn scale(&self, factor: &Scalar) -> Matrix {
        let data = self.data().iter()
            .map(|row| row.iter().map(|cell| cell.mul(factor)).collect())
            .collect();
        Matrix::from_grid(data)
    }

    // ============ resize ============

    /// New shape keeping the overlapping cells; new cells are zero
    pub fn resize(&self, rows: usize, columns: usize) -> Result<Matrix, MatrixError> {
        let mut resized = Matrix::zeros(rows, columns)?;
        {
            let grid = resized.data_mut();
            for (i, row) in self.data().iter().take(rows).enumerate() {
                for (j, cell) in row.iter().take(columns).enumerate() {
                    grid[i][j] = cell.clone();
                }
            }
        }
        Ok(resized)
    }

    // ============ power ============

    /// Raise to a scalar exponent, which must be a whole number
    pub fn raise_to_power(&self, power: &Scalar) -> Result<Matrix, MatrixError> {
        self.check_square()?;

        let exponent = power.to_integer()
            .ok_or_else(|| MatrixError::NonIntegerPower(power.to_string()))?;
        let exponent: i64 = exponent.try_into()
            .map_err(|_| power_out_of_range(power))?;

        self.power(exponent)
    }

    /// Integer power: identity for 0, inverse powers for negatives
    ///
    /// Exponents beyond ±`MAX_POWER` are rejected.
    pub fn power(&self, exponent: i64) -> Result<Matrix, MatrixError> {
        self.check_square()?;

        if exponent.unsigned_abs() > MAX_POWER as u64 {
            return Err(power_out_of_range(exponent));
        }

        if exponent == 0 {
            return Matrix::identity(self.rows());
        }

        if exponent < 0 {
            return self.inverse()?.power_positive(exponent.unsigned_abs());
        }

        self.power_positive(exponent as u64)
    }

    /// Square-and-multiply; products of exact matrices are associative,
    /// so this equals repeated multiplication
    fn power_positive(&self, mut exponent: u64) -> Result<Matrix, MatrixError> {
        let mut result = Matrix::identity(self.rows())?;
        let mut base = self.clone();

        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.multiply(&base)?;
            }
            exponent >>= 1;
            if exponent > 0 {
                base = base.multiply(&base)?;
            }
        }

        Ok(result)
    }
}

fn power_out_of_range(power: impl std::fmt::Display) -> MatrixError {
    MatrixError::NonIntegerPower(format!("{} (magnitude above {})", power, MAX_POWER))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[Vec<i64>]) -> Matrix {
        Matrix::from_integers(rows).unwrap()
    }

    #[test]
    fn test_set_returns_copy() {
        let a = m(&[vec![1, 2], vec![3, 4]]);
        let b = a.set(0, 1, Scalar::from(9)).unwrap();
        assert_eq!(b, m(&[vec![1, 9], vec![3, 4]]));
        assert_eq!(a.get(0, 1), Some(&Scalar::from(2)));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let a = m(&[vec![1, 2]]);
        assert!(matches!(a.set(1, 0, Scalar::zero()), Err(MatrixError::IndexOutOfBounds(_))));
        assert!(matches!(a.set(0, 2, Scalar::zero()), Err(MatrixError::IndexOutOfBounds(_))));
    }

    #[test]
    fn test_sub_matrix() {
        let a = m(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]);
        assert_eq!(a.sub_matrix(1, 1).unwrap(), m(&[vec![1, 3], vec![7, 9]]));
        assert_eq!(a.sub_matrix(0, 2).unwrap(), m(&[vec![4, 5], vec![7, 8]]));
        assert!(a.sub_matrix(3, 0).is_err());
    }

    #[test]
    fn test_transpose() {
        let a = m(&[vec![1, 2, 3], vec![4, 5, 6]]);
        let t = a.transpose();
        assert_eq!(t, m(&[vec![1, 4], vec![2, 5], vec![3, 6]]));
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn test_multiply() {
        let a = m(&[vec![1, 2], vec![3, 4]]);
        let b = m(&[vec![5, 6], vec![7, 8]]);
        assert_eq!(a.multiply(&b).unwrap(), m(&[vec![19, 22], vec![43, 50]]));
    }

    #[test]
    fn test_multiply_rectangular() {
        let a = m(&[vec![1, 2, 3]]);
        let b = m(&[vec![1], vec![1], vec![1]]);
        assert_eq!(a.multiply(&b).unwrap(), m(&[vec![6]]));
        assert_eq!(b.multiply(&a).unwrap().rows(), 3);
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = m(&[vec![1, 2]]);
        assert!(matches!(a.multiply(&a), Err(MatrixError::DimensionMismatch(_))));
    }

    #[test]
    fn test_identity_is_neutral() {
        let a = m(&[vec![1, -2, 3], vec![0, 5, 7]]);
        assert_eq!(a.multiply(&Matrix::identity(3).unwrap()).unwrap(), a);
        assert_eq!(Matrix::identity(2).unwrap().multiply(&a).unwrap(), a);
    }

    #[test]
    fn test_scale() {
        let a = m(&[vec![2, 4]]);
        let half = Scalar::new(1, 2).unwrap();
        assert_eq!(a.scale(&half), m(&[vec![1, 2]]));
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let a = m(&[vec![1, 2], vec![3, 4]]);
        assert_eq!(a.resize(3, 1).unwrap(), m(&[vec![1], vec![3], vec![0]]));
        assert_eq!(a.resize(1, 3).unwrap(), m(&[vec![1, 2, 0]]));
        assert!(a.resize(0, 2).is_err());
    }

    #[test]
    fn test_power_zero_is_identity() {
        let a = m(&[vec![2, 7], vec![1, 8]]);
        assert_eq!(a.power(0).unwrap(), Matrix::identity(2).unwrap());
    }

    #[test]
    fn test_power_matches_repeated_multiplication() {
        let a = m(&[vec![1, 1], vec![1, 0]]);
        let mut expected = a.clone();
        for _ in 1..7 {
            expected = a.multiply(&expected).unwrap();
        }
        assert_eq!(a.power(7).unwrap(), expected);
        // Fibonacci: [[F8, F7], [F7, F6]]
        assert_eq!(a.power(7).unwrap(), m(&[vec![21, 13], vec![13, 8]]));
    }

    #[test]
    fn test_negative_power_uses_inverse() {
        let a = m(&[vec![2, 0], vec![0, 4]]);
        let expected = Matrix::from_rows(vec![
            vec![Scalar::new(1, 4).unwrap(), Scalar::zero()],
            vec![Scalar::zero(), Scalar::new(1, 16).unwrap()],
        ]).unwrap();
        assert_eq!(a.power(-2).unwrap(), expected);
    }

    #[test]
    fn test_negative_power_of_singular_matrix() {
        let a = m(&[vec![1, 2], vec![2, 4]]);
        assert_eq!(a.power(-1), Err(MatrixError::SingularMatrix));
    }

    #[test]
    fn test_raise_to_power_rejects_fractions() {
        let a = m(&[vec![1, 0], vec![0, 1]]);
        let half = Scalar::new(1, 2).unwrap();
        assert!(matches!(a.raise_to_power(&half), Err(MatrixError::NonIntegerPower(_))));
        // 4/2 reduces to a whole number
        assert!(a.raise_to_power(&Scalar::new(4, 2).unwrap()).is_ok());
    }

    #[test]
    fn test_power_magnitude_is_bounded() {
        let a = m(&[vec![2]]);
        assert!(matches!(a.power(MAX_POWER + 1), Err(MatrixError::NonIntegerPower(_))));
        assert!(matches!(a.power(-MAX_POWER - 1), Err(MatrixError::NonIntegerPower(_))));
        let huge = Scalar::from(1_000_000_000_000);
        assert!(matches!(a.raise_to_power(&huge), Err(MatrixError::NonIntegerPower(_))));
        assert_eq!(m(&[vec![1]]).power(MAX_POWER).unwrap(), m(&[vec![1]]));
    }

    #[test]
    fn test_power_requires_square() {
        let a = m(&[vec![1, 2, 3]]);
        assert!(matches!(a.power(2), Err(MatrixError::NotSquare { rows: 1, columns: 3 })));
    }
}
