//! Operation executor

use crate::registry::OperationKind;
use crate::traits::Interaction;
use matrixplay_core::{PlayError, Scalar};
use matrixplay_matrix::{Matrix, MatrixError};
use serde::Serialize;

/// Outcome of running an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Executed {
    pub matrix: Matrix,
    /// `(row, column)` of every cell whose value was rewritten
    pub modified_cells: Vec<(usize, usize)>,
}

/// Check one selected index against the axis the operation works on
pub fn validate_index(
    kind: OperationKind,
    matrix: &Matrix,
    step: usize,
    index: usize,
) -> Result<(), PlayError> {
    let (axis, limit) = match (kind.meta().interaction, step) {
        (Interaction::SelectRow, _) | (Interaction::EditCell, 0) => ("row", matrix.rows()),
        (Interaction::SelectColumn, _) | (Interaction::EditCell, _) => ("column", matrix.columns()),
    };

    if index >= limit {
        return Err(MatrixError::IndexOutOfBounds(format!(
            "{} {} in a matrix with {} {}s",
            axis, index, limit, axis
        ))
        .into());
    }
    Ok(())
}

/// Run `kind` on an owned copy of a matrix
pub fn execute(
    kind: OperationKind,
    matrix: Matrix,
    selection: &[usize],
    scalar: Option<&Scalar>,
) -> Result<Executed, PlayError> {
    let meta = kind.meta();

    if selection.len() != meta.selection_size {
        return Err(PlayError::invalid_selection(format!(
            "{} needs {} selection(s), got {}",
            meta.name, meta.selection_size, selection.len()
        ))
        .in_operation(meta.name));
    }
    for (step, &index) in selection.iter().enumerate() {
        validate_index(kind, &matrix, step, index).map_err(|e| e.in_operation(meta.name))?;
    }

    let factor = match (meta.requires_scalar, scalar) {
        (true, Some(s)) => s.clone(),
        (true, None) => {
            return Err(PlayError::invalid_scalar(format!("{} requires a scalar", meta.name))
                .in_operation(meta.name));
        }
        (false, _) => Scalar::one(),
    };

    let result = match kind {
        OperationKind::SwapRows => swap_rows(matrix, selection[0], selection[1]),
        OperationKind::SwapColumns => swap_columns(matrix, selection[0], selection[1]),
        OperationKind::AddRows => add_rows(matrix, selection[0], selection[1], &factor),
        OperationKind::AddColumns => add_columns(matrix, selection[0], selection[1], &factor),
        OperationKind::MultiplyRow => multiply_row(matrix, selection[0], &factor),
        OperationKind::MultiplyColumn => multiply_column(matrix, selection[0], &factor),
        OperationKind::DeleteRow => delete_row(matrix, selection[0]),
        OperationKind::DeleteColumn => delete_column(matrix, selection[0]),
        OperationKind::SetCell => set_cell(matrix, selection[0], selection[1], factor),
    };

    result.map_err(|e| PlayError::from(e).in_operation(meta.name))
}

fn rebuild(grid: Vec<Vec<Scalar>>, modified_cells: Vec<(usize, usize)>) -> Result<Executed, MatrixError> {
    Ok(Executed { matrix: Matrix::from_rows(grid)?, modified_cells })
}

fn row_cells(row: usize, columns: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..columns).map(move |j| (row, j))
}

fn column_cells(column: usize, rows: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..rows).map(move |i| (i, column))
}

fn swap_rows(matrix: Matrix, a: usize, b: usize) -> Result<Executed, MatrixError> {
    let columns = matrix.columns();
    let mut grid = matrix.into_data();
    grid.swap(a, b);

    let mut modified: Vec<_> = row_cells(a, columns).collect();
    if a != b {
        modified.extend(row_cells(b, columns));
    }
    rebuild(grid, modified)
}

fn swap_columns(matrix: Matrix, a: usize, b: usize) -> Result<Executed, MatrixError> {
    let rows = matrix.rows();
    let mut grid = matrix.into_data();
    for row in grid.iter_mut() {
        row.swap(a, b);
    }

    let mut modified: Vec<_> = column_cells(a, rows).collect();
    if a != b {
        modified.extend(column_cells(b, rows));
    }
    rebuild(grid, modified)
}

/// `dst ← dst + factor·src`
fn add_rows(matrix: Matrix, src: usize, dst: usize, factor: &Scalar) -> Result<Executed, MatrixError> {
    let columns = matrix.columns();
    let mut grid = matrix.into_data();
    let source = grid[src].clone();
    for (cell, s) in grid[dst].iter_mut().zip(source.iter()) {
        *cell = cell.add(&s.mul(factor));
    }
    rebuild(grid, row_cells(dst, columns).collect())
}

fn add_columns(matrix: Matrix, src: usize, dst: usize, factor: &Scalar) -> Result<Executed, MatrixError> {
    let rows = matrix.rows();
    let mut grid = matrix.into_data();
    for row in grid.iter_mut() {
        let addend = row[src].mul(factor);
        row[dst] = row[dst].add(&addend);
    }
    rebuild(grid, column_cells(dst, rows).collect())
}

fn multiply_row(matrix: Matrix, row: usize, factor: &Scalar) -> Result<Executed, MatrixError> {
    let columns = matrix.columns();
    let mut grid = matrix.into_data();
    for cell in grid[row].iter_mut() {
        *cell = cell.mul(factor);
    }
    rebuild(grid, row_cells(row, columns).collect())
}

fn multiply_column(matrix: Matrix, column: usize, factor: &Scalar) -> Result<Executed, MatrixError> {
    let rows = matrix.rows();
    let mut grid = matrix.into_data();
    for row in grid.iter_mut() {
        row[column] = row[column].mul(factor);
    }
    rebuild(grid, column_cells(column, rows).collect())
}

fn delete_row(matrix: Matrix, row: usize) -> Result<Executed, MatrixError> {
    if matrix.rows() == 1 {
        return Err(MatrixError::DimensionMismatch(
            "cannot delete the only row".to_string(),
        ));
    }
    let mut grid = matrix.into_data();
    grid.remove(row);
    rebuild(grid, Vec::new())
}

fn delete_column(matrix: Matrix, column: usize) -> Result<Executed, MatrixError> {
    if matrix.columns() == 1 {
        return Err(MatrixError::DimensionMismatch(
            "cannot delete the only column".to_string(),
        ));
    }
    let mut grid = matrix.into_data();
    for row in grid.iter_mut() {
        row.remove(column);
    }
    rebuild(grid, Vec::new())
}

fn set_cell(matrix: Matrix, row: usize, column: usize, value: Scalar) -> Result<Executed, MatrixError> {
    Ok(Executed {
        matrix: matrix.set(row, column, value)?,
        modified_cells: vec![(row, column)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrixplay_core::codes;

    fn m(rows: &[Vec<i64>]) -> Matrix {
        Matrix::from_integers(rows).unwrap()
    }

    fn s(n: i64) -> Scalar {
        Scalar::from(n)
    }

    #[test]
    fn test_add_rows_scenario() {
        let out = execute(OperationKind::AddRows, m(&[vec![1, 0], vec![0, 1]]), &[0, 1], Some(&s(2))).unwrap();
        assert_eq!(out.matrix, m(&[vec![1, 0], vec![2, 1]]));
        assert_eq!(out.modified_cells, vec![(1, 0), (1, 1)]);
    }

    #[test]
    fn test_add_rows_same_row_doubles() {
        let out = execute(OperationKind::AddRows, m(&[vec![1, 2], vec![3, 4]]), &[1, 1], Some(&s(1))).unwrap();
        assert_eq!(out.matrix, m(&[vec![1, 2], vec![6, 8]]));
    }

    #[test]
    fn test_add_columns() {
        let half = Scalar::new(1, 2).unwrap();
        let out = execute(OperationKind::AddColumns, m(&[vec![2, 1], vec![4, 0]]), &[0, 1], Some(&half)).unwrap();
        assert_eq!(out.matrix, m(&[vec![2, 2], vec![4, 2]]));
        assert_eq!(out.modified_cells, vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn test_swap_rows() {
        let out = execute(OperationKind::SwapRows, m(&[vec![1, 2], vec![3, 4], vec![5, 6]]), &[0, 2], None).unwrap();
        assert_eq!(out.matrix, m(&[vec![5, 6], vec![3, 4], vec![1, 2]]));
        assert_eq!(out.modified_cells, vec![(0, 0), (0, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_swap_columns() {
        let out = execute(OperationKind::SwapColumns, m(&[vec![1, 2, 3]]), &[0, 2], None).unwrap();
        assert_eq!(out.matrix, m(&[vec![3, 2, 1]]));
        assert_eq!(out.modified_cells, vec![(0, 0), (0, 2)]);
    }

    #[test]
    fn test_multiply_row_and_column() {
        let third = Scalar::new(1, 3).unwrap();
        let out = execute(OperationKind::MultiplyRow, m(&[vec![3, 6], vec![1, 1]]), &[0], Some(&third)).unwrap();
        assert_eq!(out.matrix, m(&[vec![1, 2], vec![1, 1]]));

        let out = execute(OperationKind::MultiplyColumn, m(&[vec![3, 6], vec![1, 1]]), &[1], Some(&s(-1))).unwrap();
        assert_eq!(out.matrix, m(&[vec![3, -6], vec![1, -1]]));
        assert_eq!(out.modified_cells, vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn test_delete_row_and_column() {
        let out = execute(OperationKind::DeleteRow, m(&[vec![1, 2], vec![3, 4]]), &[0], None).unwrap();
        assert_eq!(out.matrix, m(&[vec![3, 4]]));
        assert!(out.modified_cells.is_empty());

        let out = execute(OperationKind::DeleteColumn, m(&[vec![1, 2], vec![3, 4]]), &[1], None).unwrap();
        assert_eq!(out.matrix, m(&[vec![1], vec![3]]));
    }

    #[test]
    fn test_delete_last_row_rejected() {
        let err = execute(OperationKind::DeleteRow, m(&[vec![1, 2]]), &[0], None).unwrap_err();
        assert_eq!(err.code, codes::DIMENSION_MISMATCH);
        let err = execute(OperationKind::DeleteColumn, m(&[vec![1], vec![2]]), &[0], None).unwrap_err();
        assert_eq!(err.code, codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_set_cell() {
        let v = Scalar::new(7, 2).unwrap();
        let out = execute(OperationKind::SetCell, m(&[vec![1, 2, 3]]), &[0, 2], Some(&v)).unwrap();
        assert_eq!(out.matrix.get(0, 2), Some(&v));
        assert_eq!(out.modified_cells, vec![(0, 2)]);
    }

    #[test]
    fn test_out_of_range_selection() {
        let err = execute(OperationKind::SwapRows, m(&[vec![1, 2]]), &[0, 1], None).unwrap_err();
        assert_eq!(err.code, codes::INDEX_OUT_OF_BOUNDS);
        assert_eq!(err.context.unwrap().operation.as_deref(), Some("swap_rows"));

        // Column index is checked against columns, not rows
        assert!(execute(OperationKind::SwapColumns, m(&[vec![1, 2]]), &[0, 1], None).is_ok());
        assert!(validate_index(OperationKind::SetCell, &m(&[vec![1, 2]]), 1, 1).is_ok());
        assert!(validate_index(OperationKind::SetCell, &m(&[vec![1, 2]]), 0, 1).is_err());
    }

    #[test]
    fn test_wrong_selection_count() {
        let err = execute(OperationKind::SwapRows, m(&[vec![1], vec![2]]), &[0], None).unwrap_err();
        assert_eq!(err.code, codes::INVALID_SELECTION);
    }

    #[test]
    fn test_missing_scalar() {
        let err = execute(OperationKind::MultiplyRow, m(&[vec![1]]), &[0], None).unwrap_err();
        assert_eq!(err.code, codes::INVALID_SCALAR);
    }
}
