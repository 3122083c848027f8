//! Matrix properties: determinant, trace

use matrixplay_core::Scalar;
use crate::types::{Matrix, MatrixError};

impl Matrix {
    /// Determinant by cofactor expansion along the first row
    ///
    /// Cost grows factorially with size, which is fine for hand-edited
    /// matrices; the result is exact.
    pub fn determinant(&self) -> Result<Scalar, MatrixError> {
        self.check_square()?;

        let data = self.data();
        match self.rows() {
            1 => Ok(data[0][0].clone()),
            2 => Ok(data[0][0].mul(&data[1][1]).sub(&data[0][1].mul(&data[1][0]))),
            _ => {
                let mut det = Scalar::zero();
                for (i, cell) in data[0].iter().enumerate() {
                    if cell.is_zero() {
                        continue;
                    }
                    let minor = self.sub_matrix(0, i)?.determinant()?;
                    let term = cell.mul(&minor);
                    det = if i % 2 == 0 { det.add(&term) } else { det.sub(&term) };
                }
                Ok(det)
            }
        }
    }

    /// Signed minor `(-1)^(row+col) · det(sub_matrix(row, col))`
    pub fn cofactor(&self, row: usize, col: usize) -> Result<Scalar, MatrixError> {
        let minor = self.sub_matrix(row, col)?.determinant()?;
        Ok(if (row + col) % 2 == 0 { minor } else { minor.neg() })
    }

    /// Sum of the diagonal
    pub fn trace(&self) -> Result<Scalar, MatrixError> {
        self.check_square()?;
        Ok((0..self.rows()).fold(Scalar::zero(), |acc, i| acc.add(&self.data()[i][i])))
    }
}
