//! Plain-text renderer
//!
//! Draws matrices as right-aligned grids for terminals. Cells that the
//! last change touched are marked with `*`.

use crate::{MatrixSlot, Playground};
use matrixplay_matrix::Matrix;

/// Text view of a playground
pub struct Renderer {
    /// Marker appended to highlighted cells
    highlight: char,
}

impl Renderer {
    pub fn new() -> Self {
        Self { highlight: '*' }
    }

    pub fn with_highlight(mut self, marker: char) -> Self {
        self.highlight = marker;
        self
    }

    /// Render one matrix, one bracketed line per row
    pub fn render_matrix(&self, matrix: &Matrix, highlighted: &[(usize, usize)]) -> String {
        let cells: Vec<Vec<String>> = matrix.data()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, value)| {
                        if highlighted.contains(&(i, j)) {
                            format!("{}{}", value, self.highlight)
                        } else {
                            value.to_string()
                        }
                    })
                    .collect()
            })
            .collect();

        // Column widths
        let widths: Vec<usize> = (0..matrix.columns())
            .map(|j| cells.iter().map(|row| row[j].chars().count()).max().unwrap_or(0))
            .collect();

        let mut output = String::new();
        for row in &cells {
            let padded: Vec<String> = row.iter()
                .zip(widths.iter())
                .map(|(cell, &width)| format!("{:>width$}", cell, width = width))
                .collect();
            output.push_str(&format!("[ {} ]\n", padded.join("  ")));
        }
        output
    }

    /// Render the matrices on screen, the prompt and the history cursor
    pub fn render<M>(&self, playground: &Playground<M>) -> String {
        let mut output = String::new();
        let highlights = playground.highlights();

        output.push_str(&self.section(MatrixSlot::Main, playground.main()));
        output.push_str(&self.render_matrix(playground.main(), &highlights.main));

        if playground.is_multiplication_mode() {
            output.push('\n');
            output.push_str(&self.section(MatrixSlot::Multiplying, playground.multiplying()));
            output.push_str(&self.render_matrix(playground.multiplying(), &highlights.multiplying));

            output.push('\n');
            match playground.result() {
                Some(result) => {
                    output.push_str(&self.section(MatrixSlot::Result, &result));
                    output.push_str(&self.render_matrix(&result, &[]));
                }
                None => output.push_str("## result: undefined (incompatible dimensions)\n"),
            }
        }

        if let Some(instruction) = playground.instruction() {
            output.push_str(&format!("\n> {}\n", instruction));
        }

        let history = playground.history();
        output.push_str(&format!(
            "\nhistory: entry {} of {}\n",
            history.current_index() + 1,
            history.len()
        ));
        output
    }

    fn section(&self, slot: MatrixSlot, matrix: &Matrix) -> String {
        format!("## {} ({}×{})\n", slot, matrix.rows(), matrix.columns())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MultiplyOrder, PlaygroundConfig};
    use matrixplay_core::Scalar;

    #[test]
    fn test_render_matrix_aligns_columns() {
        let m = Matrix::from_rows(vec![
            vec![Scalar::from(1), Scalar::new(-1, 2).unwrap()],
            vec![Scalar::from(10), Scalar::from(3)],
        ]).unwrap();
        let text = Renderer::new().render_matrix(&m, &[]);
        assert_eq!(text, "[  1  -1/2 ]\n[ 10     3 ]\n");
    }

    #[test]
    fn test_render_marks_highlights() {
        let m = Matrix::from_integers(&[vec![1, 2]]).unwrap();
        let text = Renderer::new().render_matrix(&m, &[(0, 1)]);
        assert_eq!(text, "[ 1  2* ]\n");
        let text = Renderer::new().with_highlight('!').render_matrix(&m, &[(0, 0)]);
        assert_eq!(text, "[ 1!  2 ]\n");
    }

    #[test]
    fn test_render_playground() {
        let mut p: Playground = Playground::new(PlaygroundConfig::new());
        let text = Renderer::new().render(&p);
        assert!(text.starts_with("## main (3×3)\n"));
        assert!(text.contains("history: entry 1 of 1"));
        assert!(!text.contains("multiplying"));

        p.enter_multiplication(MultiplyOrder::MainFirst).unwrap();
        let text = Renderer::new().render(&p);
        assert!(text.contains("## multiplying (3×3)"));
        assert!(text.contains("## result (3×3)"));
    }
}
