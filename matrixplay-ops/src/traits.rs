//! Operation metadata

use serde::Serialize;

/// How the user picks the operands of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interaction {
    SelectRow,
    SelectColumn,
    EditCell,
}

impl Interaction {
    /// Noun used in prompts and error messages
    pub fn axis(&self) -> &'static str {
        match self {
            Interaction::SelectRow => "row",
            Interaction::SelectColumn => "column",
            Interaction::EditCell => "cell",
        }
    }
}

/// Static description of an operation kind
#[derive(Debug, Clone, Serialize)]
pub struct OperationMeta {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub interaction: Interaction,
    pub selection_size: usize,
    pub requires_scalar: bool,
    /// One prompt per selection step, then one for the scalar if needed
    pub instructions: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<char>,
}

impl OperationMeta {
    /// Number of steps before the operation can run
    pub fn step_count(&self) -> usize {
        self.selection_size + usize::from(self.requires_scalar)
    }

    /// Prompt for a step, clamped to the last one
    pub fn instruction(&self, step: usize) -> &'static str {
        self.instructions
            .get(step)
            .or_else(|| self.instructions.last())
            .copied()
            .unwrap_or("")
    }
}

pub(crate) static SWAP_ROWS: OperationMeta = OperationMeta {
    name: "swap_rows",
    display_name: "Swap Rows",
    description: "Exchange two rows",
    interaction: Interaction::SelectRow,
    selection_size: 2,
    requires_scalar: false,
    instructions: &[
        "Select the first row to swap.",
        "Select the second row to swap.",
    ],
    shortcut: Some('r'),
};

pub(crate) static SWAP_COLUMNS: OperationMeta = OperationMeta {
    name: "swap_columns",
    display_name: "Swap Columns",
    description: "Exchange two columns",
    interaction: Interaction::SelectColumn,
    selection_size: 2,
    requires_scalar: false,
    instructions: &[
        "Select the first column to swap.",
        "Select the second column to swap.",
    ],
    shortcut: Some('c'),
};

pub(crate) static ADD_ROWS: OperationMeta = OperationMeta {
    name: "add_rows",
    display_name: "Add Rows",
    description: "Add a multiple of the source row to the destination row",
    interaction: Interaction::SelectRow,
    selection_size: 2,
    requires_scalar: true,
    instructions: &[
        "Select the source row.",
        "Select the destination row.",
        "Enter the scalar to multiply the source row by.",
    ],
    shortcut: Some('a'),
};

pub(crate) static ADD_COLUMNS: OperationMeta = OperationMeta {
    name: "add_columns",
    display_name: "Add Columns",
    description: "Add a multiple of the source column to the destination column",
    interaction: Interaction::SelectColumn,
    selection_size: 2,
    requires_scalar: true,
    instructions: &[
        "Select the source column.",
        "Select the destination column.",
        "Enter the scalar to multiply the source column by.",
    ],
    shortcut: None,
};

pub(crate) static MULTIPLY_ROW: OperationMeta = OperationMeta {
    name: "multiply_row",
    display_name: "Multiply Row",
    description: "Multiply every cell of a row by a scalar",
    interaction: Interaction::SelectRow,
    selection_size: 1,
    requires_scalar: true,
    instructions: &[
        "Select the row to multiply.",
        "Enter the scalar to multiply the row by.",
    ],
    shortcut: Some('m'),
};

pub(crate) static MULTIPLY_COLUMN: OperationMeta = OperationMeta {
    name: "multiply_column",
    display_name: "Multiply Column",
    description: "Multiply every cell of a column by a scalar",
    interaction: Interaction::SelectColumn,
    selection_size: 1,
    requires_scalar: true,
    instructions: &[
        "Select the column to multiply.",
        "Enter the scalar to multiply the column by.",
    ],
    shortcut: None,
};

pub(crate) static DELETE_ROW: OperationMeta = OperationMeta {
    name: "delete_row",
    display_name: "Delete Row",
    description: "Remove a row",
    interaction: Interaction::SelectRow,
    selection_size: 1,
    requires_scalar: false,
    instructions: &["Select the row to delete."],
    shortcut: Some('d'),
};

pub(crate) static DELETE_COLUMN: OperationMeta = OperationMeta {
    name: "delete_column",
    display_name: "Delete Column",
    description: "Remove a column",
    interaction: Interaction::SelectColumn,
    selection_size: 1,
    requires_scalar: false,
    instructions: &["Select the column to delete."],
    shortcut: None,
};

pub(crate) static SET_CELL: OperationMeta = OperationMeta {
    name: "set_cell",
    display_name: "Edit Cell",
    description: "Replace the value of a single cell",
    interaction: Interaction::EditCell,
    selection_size: 2,
    requires_scalar: true,
    instructions: &[
        "Select the row of the cell.",
        "Select the column of the cell.",
        "Enter the new value.",
    ],
    shortcut: None,
};
