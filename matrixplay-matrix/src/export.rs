//! Text export of a matrix

use crate::types::Matrix;

/// Delimiters used to lay a matrix out as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStyle {
    pub open: &'static str,
    pub close: &'static str,
    pub row_break: &'static str,
    pub column_separator: &'static str,
}

impl ExportStyle {
    /// `bmatrix` environment from amsmath
    pub fn latex() -> Self {
        Self {
            open: "\\begin{bmatrix}\n",
            close: "\n\\end{bmatrix}",
            row_break: " \\\\\n",
            column_separator: " & ",
        }
    }

    /// Whitespace separated rows, one per line
    pub fn plain() -> Self {
        Self {
            open: "",
            close: "",
            row_break: "\n",
            column_separator: " ",
        }
    }
}

impl Default for ExportStyle {
    fn default() -> Self {
        Self::latex()
    }
}

impl Matrix {
    /// Render every cell in its simplified textual form
    pub fn export(&self, style: &ExportStyle) -> String {
        let body = self.data()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.simplify().to_string())
                    .collect::<Vec<_>>()
                    .join(style.column_separator)
            })
            .collect::<Vec<_>>()
            .join(style.row_break);

        format!("{}{}{}", style.open, body, style.close)
    }

    pub fn to_latex(&self) -> String {
        self.export(&ExportStyle::latex())
    }
}
