//! Inverse and row reduction

use crate::types::{Matrix, MatrixError};

impl Matrix {
    // ============ inverse ============

    /// Exact inverse via the adjugate: `adj(A) / det(A)`
    pub fn inverse(&self) -> Result<Matrix, MatrixError> {
        self.check_square()?;

        let det = self.determinant()?;
        if det.is_zero() {
            return Err(MatrixError::SingularMatrix);
        }
        let factor = det.inverse()?;

        if self.rows() == 1 {
            return Ok(Matrix::from_grid(vec![vec![factor]]));
        }

        let n = self.rows();
        let mut cofactors = Vec::with_capacity(n);
        for i in 0..n {
            let mut row = Vec::with_capacity(n);
            for j in 0..n {
                row.push(self.cofactor(i, j)?);
            }
            cofactors.push(row);
        }

        Ok(Matrix::from_grid(cofactors).transpose().scale(&factor))
    }

    // ============ rref ============

    /// Reduced row echelon form by Gauss-Jordan elimination
    ///
    /// Every pivot is 1 and the only nonzero entry of its column. Works on
    /// any shape; the receiver is left untouched.
    pub fn rref(&self) -> Matrix {
        let mut reduced = self.clone();
        let rows = reduced.rows();
        let columns = reduced.columns();
        let grid = reduced.data_mut();

        let mut lead = 0;
        for r in 0..rows {
            // First row at or below r with an invertible (nonzero) entry in
            // the lead column, moving right past all-zero columns
            let (i, inverse) = loop {
                if lead >= columns {
                    return reduced;
                }
                let found = (r..rows)
                    .find_map(|i| grid[i][lead].inverse().ok().map(|inverse| (i, inverse)));
                match found {
                    Some(found) => break found,
                    None => lead += 1,
                }
            };
            grid.swap(i, r);

            for cell in grid[r].iter_mut() {
                *cell = cell.mul(&inverse);
            }

            let pivot_row = grid[r].clone();
            for (k, row) in grid.iter_mut().enumerate() {
                if k == r || row[lead].is_zero() {
                    continue;
                }
                let factor = row[lead].clone();
                for (cell, p) in row.iter_mut().zip(pivot_row.iter()) {
                    *cell = cell.sub(&factor.mul(p));
                }
            }

            lead += 1;
        }

        reduced
    }

    /// Number of pivots in the reduced form
    pub fn rank(&self) -> usize {
        self.rref()
            .data()
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.is_zero()))
            .count()
    }
}
