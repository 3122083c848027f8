//! Matrix Playground - Interactive exact matrix algebra
//!
//! `Playground` holds the whole interactive state: the main matrix, the
//! multiplying matrix used in multiplication mode, the pending operation
//! and the snapshot history. Every mutating call computes its new state
//! first and assigns it only on success, so a failed call leaves the
//! playground exactly as it was.

mod history;
mod protocol;
mod render;

pub use history::{History, HistoryEntry};
pub use protocol::{Advance, Event, MatrixSlot, Operation, Protocol, ProtocolState};
pub use render::Renderer;

pub use matrixplay_core::{parse_scalar, PlayError, Scalar};
pub use matrixplay_matrix::{ExportStyle, Matrix};
pub use matrixplay_ops::{Interaction, OperationKind, OperationMeta, OperationRegistry};

use serde::Serialize;
use tracing::{debug, info, warn};

/// Which matrix goes on the left of the product when entering
/// multiplication mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiplyOrder {
    /// "Multiply by": main × multiplying
    MainFirst,
    /// "Multiply other": the two matrices trade places first
    MultiplyingFirst,
}

/// Which matrix survives when leaving multiplication mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Keep {
    Multiplied,
    Multiplying,
    Result,
}

/// Initial state of a playground
#[derive(Debug, Clone)]
pub struct PlaygroundConfig {
    pub main: Matrix,
    pub multiplying: Matrix,
    pub history_limit: Option<usize>,
}

impl PlaygroundConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_main(mut self, matrix: Matrix) -> Self {
        self.main = matrix;
        self
    }

    pub fn with_multiplying(mut self, matrix: Matrix) -> Self {
        self.multiplying = matrix;
        self
    }

    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            main: Matrix::from_integers(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]])
                .unwrap_or_default(),
            multiplying: Matrix::identity(3).unwrap_or_default(),
            history_limit: None,
        }
    }
}

/// Cells highlighted after the last change of each editable matrix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlights {
    pub main: Vec<(usize, usize)>,
    pub multiplying: Vec<(usize, usize)>,
}

/// Serializable view of the whole playground
#[derive(Debug, Clone, Serialize)]
pub struct PlaygroundSnapshot<'a> {
    pub main: &'a Matrix,
    pub multiplying: &'a Matrix,
    pub multiplication_mode: bool,
    pub result: Option<Matrix>,
    pub state: ProtocolState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<OperationKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<&'static str>,
    pub highlights: &'a Highlights,
    pub history: &'a History,
    pub current_entry: usize,
}

/// The interactive matrix playground
///
/// `M` is the marker type handed back when a pending operation is
/// cancelled.
#[derive(Debug)]
pub struct Playground<M = ()> {
    main: Matrix,
    multiplying: Matrix,
    multiplication_mode: bool,
    protocol: Protocol<M>,
    history: History,
    highlights: Highlights,
    /// The newest history entry came from a resize and may be overwritten
    /// by the next one
    coalesce_resize: bool,
    registry: OperationRegistry,
}

impl<M> Playground<M> {
    pub fn new(config: PlaygroundConfig) -> Self {
        let initial = HistoryEntry::with_multiplying(config.main.clone(), config.multiplying.clone())
            .showing_multiplying(false);
        let history = History::new(initial).with_limit(config.history_limit);

        info!(
            rows = config.main.rows(),
            columns = config.main.columns(),
            history_limit = ?config.history_limit,
            "playground created"
        );

        Self {
            main: config.main,
            multiplying: config.multiplying,
            multiplication_mode: false,
            protocol: Protocol::new(),
            history,
            highlights: Highlights::default(),
            coalesce_resize: false,
            registry: OperationRegistry::standard(),
        }
    }

    // ========== Accessors ==========

    pub fn main(&self) -> &Matrix {
        &self.main
    }

    pub fn multiplying(&self) -> &Matrix {
        &self.multiplying
    }

    pub fn matrix(&self, slot: MatrixSlot) -> Option<Matrix> {
        match slot {
            MatrixSlot::Main => Some(self.main.clone()),
            MatrixSlot::Multiplying => Some(self.multiplying.clone()),
            MatrixSlot::Result => self.result(),
        }
    }

    pub fn is_multiplication_mode(&self) -> bool {
        self.multiplication_mode
    }

    /// Product of main and multiplying while in multiplication mode;
    /// `None` outside the mode or when the shapes do not chain
    pub fn result(&self) -> Option<Matrix> {
        if !self.multiplication_mode {
            return None;
        }
        self.main.multiply(&self.multiplying).ok()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn state(&self) -> ProtocolState {
        self.protocol.state()
    }

    pub fn pending(&self) -> Option<&Operation<M>> {
        self.protocol.pending()
    }

    pub fn instruction(&self) -> Option<&'static str> {
        self.protocol.instruction()
    }

    pub fn snapshot(&self) -> PlaygroundSnapshot<'_> {
        PlaygroundSnapshot {
            main: &self.main,
            multiplying: &self.multiplying,
            multiplication_mode: self.multiplication_mode,
            result: self.result(),
            state: self.state(),
            operation: self.pending().map(|op| op.kind),
            instruction: self.instruction(),
            highlights: &self.highlights,
            history: &self.history,
            current_entry: self.history.current_index(),
        }
    }

    // ========== Selection protocol ==========

    pub fn start(&mut self, kind: OperationKind) -> Result<Vec<Event>, PlayError> {
        let instruction = self.protocol.start(kind)?;
        debug!(operation = kind.name(), "operation started");
        Ok(vec![Event::instruction(instruction)])
    }

    pub fn start_by_name(&mut self, name: &str) -> Result<Vec<Event>, PlayError> {
        let kind = self.registry.by_name(name)?;
        self.start(kind)
    }

    /// Start the operation bound to a keyboard key
    pub fn start_by_shortcut(&mut self, key: char) -> Result<Vec<Event>, PlayError> {
        let kind = self.registry.by_shortcut(key).ok_or_else(|| {
            PlayError::unknown_operation(&key.to_string())
                .with_suggestion("Shortcuts: r, c, a, m, d")
        })?;
        self.start(kind)
    }

    /// Select a row or column of `slot` for the pending operation
    pub fn select(&mut self, slot: MatrixSlot, index: usize, marker: M) -> Result<Vec<Event>, PlayError> {
        let target = match slot {
            MatrixSlot::Main => &self.main,
            MatrixSlot::Multiplying => &self.multiplying,
            // The protocol rejects it; any matrix will do for the call
            MatrixSlot::Result => &self.main,
        };

        match self.protocol.select(slot, target, index, marker)? {
            Advance::Waiting(instruction) => {
                debug!(%slot, index, "selection recorded");
                Ok(vec![Event::instruction(instruction)])
            }
            Advance::Ready(op) => self.run(op),
        }
    }

    pub fn provide_scalar(&mut self, text: &str) -> Result<Vec<Event>, PlayError> {
        match self.protocol.provide_scalar(text) {
            Ok(op) => self.run(op),
            Err(e) => {
                if self.protocol.is_idle() {
                    warn!(error = %e, "operation aborted by invalid scalar");
                }
                Err(e)
            }
        }
    }

    /// Abandon the pending operation; returns its markers for rollback
    pub fn cancel(&mut self) -> Result<(Vec<M>, Vec<Event>), PlayError> {
        let markers = self.protocol.cancel()?;
        debug!("operation cancelled");
        Ok((markers, vec![Event::OperationCancelled, Event::idle()]))
    }

    fn run(&mut self, op: Operation<M>) -> Result<Vec<Event>, PlayError> {
        let slot = op.target.unwrap_or(MatrixSlot::Main);
        let source = match slot {
            MatrixSlot::Multiplying => self.multiplying.clone(),
            _ => self.main.clone(),
        };

        let executed = match matrixplay_ops::execute(op.kind, source, &op.selection, op.scalar.as_ref()) {
            Ok(executed) => executed,
            Err(e) => {
                warn!(operation = op.kind.name(), error = %e, "operation failed");
                return Err(e);
            }
        };

        info!(operation = op.kind.name(), %slot, selection = ?op.selection, "operation applied");
        let mut events = self.replace(slot, executed.matrix, executed.modified_cells);
        events.push(Event::idle());
        Ok(events)
    }

    // ========== Direct edits ==========

    /// Parse `text` into one cell of an editable matrix
    pub fn edit_cell(&mut self, slot: MatrixSlot, row: usize, col: usize, text: &str) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        let current = self.editable(slot)?;
        let value = parse_scalar(text).map_err(|e| PlayError::from(e).at_cell(row, col))?;
        let updated = current.set(row, col, value)?;

        debug!(%slot, row, col, "cell edited");
        Ok(self.replace(slot, updated, vec![(row, col)]))
    }

    /// Change the shape of an editable matrix; consecutive resizes share
    /// one history entry
    pub fn resize(&mut self, slot: MatrixSlot, rows: usize, columns: usize) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        let updated = self.editable(slot)?.resize(rows, columns)?;

        match slot {
            MatrixSlot::Multiplying => self.multiplying = updated,
            _ => self.main = updated,
        }
        self.set_highlights(slot, Vec::new());

        let entry = self.entry();
        let index = if self.coalesce_resize {
            self.history.replace_latest(entry)
        } else {
            self.history.commit(entry)
        };
        self.coalesce_resize = true;
        debug!(%slot, rows, columns, index, "matrix resized");

        Ok(vec![
            Event::MatrixReplaced { slot, modified_cells: Vec::new() },
            Event::HistoryCommitted { index },
        ])
    }

    // ========== Direct actions on the main matrix ==========

    pub fn transpose(&mut self) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        let updated = self.main.transpose();
        info!("transposed");
        Ok(self.replace(MatrixSlot::Main, updated, Vec::new()))
    }

    pub fn inverse(&mut self) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        let updated = self.main.inverse().map_err(|e| PlayError::from(e).in_operation("inverse"))?;
        info!("inverted");
        Ok(self.replace(MatrixSlot::Main, updated, Vec::new()))
    }

    pub fn rref(&mut self) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        let updated = self.main.rref();
        info!("reduced to row echelon form");
        Ok(self.replace(MatrixSlot::Main, updated, Vec::new()))
    }

    /// Raise the main matrix to a power given as text
    ///
    /// Highlights only the cells whose value changed.
    pub fn raise_to_power(&mut self, text: &str) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        let power = parse_scalar(text).map_err(|e| PlayError::from(e).in_operation("power"))?;
        let updated = self.main.raise_to_power(&power).map_err(|e| {
            PlayError::from(e).in_operation("power").with_note(format!("exponent {}", power))
        })?;

        let modified = changed_cells(&self.main, &updated);
        info!(%power, "raised to power");
        Ok(self.replace(MatrixSlot::Main, updated, modified))
    }

    /// Determinant of the main matrix; does not touch history
    pub fn determinant(&self) -> Result<Scalar, PlayError> {
        self.main
            .determinant()
            .map_err(|e| PlayError::from(e).in_operation("determinant"))
    }

    pub fn export_latex(&self) -> String {
        self.main.to_latex()
    }

    // ========== Multiplication mode ==========

    pub fn enter_multiplication(&mut self, order: MultiplyOrder) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        if self.multiplication_mode {
            return Err(PlayError::invalid_selection("already in multiplication mode"));
        }

        self.multiplication_mode = true;
        let mut events = Vec::new();
        if order == MultiplyOrder::MultiplyingFirst {
            std::mem::swap(&mut self.main, &mut self.multiplying);
            self.highlights = Highlights::default();
            events.push(Event::MatrixReplaced { slot: MatrixSlot::Main, modified_cells: Vec::new() });
            events.push(Event::MatrixReplaced { slot: MatrixSlot::Multiplying, modified_cells: Vec::new() });
        }
        events.push(Event::MatrixReplaced { slot: MatrixSlot::Result, modified_cells: Vec::new() });

        info!(order = ?order, "multiplication mode entered");
        Ok(events)
    }

    pub fn exit_multiplication(&mut self, keep: Keep) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        if !self.multiplication_mode {
            return Err(PlayError::invalid_selection("not in multiplication mode"));
        }

        let mut events = Vec::new();
        match keep {
            Keep::Multiplied => {}
            Keep::Multiplying => {
                std::mem::swap(&mut self.main, &mut self.multiplying);
                self.highlights = Highlights::default();
            }
            Keep::Result => {
                let product = self.main.multiply(&self.multiplying).map_err(|e| {
                    PlayError::from(e).with_suggestion("Resize one of the matrices so the shapes chain")
                })?;
                self.main = product;
                self.highlights.main.clear();
            }
        }

        self.multiplication_mode = false;
        if keep != Keep::Multiplied {
            events.push(Event::MatrixReplaced { slot: MatrixSlot::Main, modified_cells: Vec::new() });
            events.push(self.commit());
        }

        info!(keep = ?keep, "multiplication mode left");
        Ok(events)
    }

    // ========== History ==========

    /// Restore the snapshot at `index`
    pub fn backstep_to(&mut self, index: usize) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        let entry = self.history.backstep_to(index)?.clone();
        debug!(index, backsteps = self.history.backsteps(), "history backstep");
        Ok(self.restore(entry))
    }

    /// One step back; an empty event list means there was nothing to undo
    pub fn undo(&mut self) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        if !self.history.undo() {
            return Ok(Vec::new());
        }
        let entry = self.history.current().clone();
        Ok(self.restore(entry))
    }

    pub fn redo(&mut self) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        if !self.history.redo() {
            return Ok(Vec::new());
        }
        let entry = self.history.current().clone();
        Ok(self.restore(entry))
    }

    pub fn clear_history(&mut self) -> Result<Vec<Event>, PlayError> {
        self.ensure_idle()?;
        self.history.clear();
        self.coalesce_resize = false;
        info!("history cleared");
        Ok(vec![Event::HistoryCommitted { index: 0 }])
    }

    // ========== Internals ==========

    fn ensure_idle(&self) -> Result<(), PlayError> {
        match self.protocol.pending() {
            Some(op) => Err(PlayError::operation_in_progress(op.kind.name())
                .with_suggestion("Finish or cancel the pending operation first")),
            None => Ok(()),
        }
    }

    fn editable(&self, slot: MatrixSlot) -> Result<&Matrix, PlayError> {
        match slot {
            MatrixSlot::Main => Ok(&self.main),
            MatrixSlot::Multiplying => Ok(&self.multiplying),
            MatrixSlot::Result => Err(PlayError::invalid_selection("the result matrix is read-only")),
        }
    }

    fn set_highlights(&mut self, slot: MatrixSlot, cells: Vec<(usize, usize)>) {
        match slot {
            MatrixSlot::Main => self.highlights.main = cells,
            MatrixSlot::Multiplying => self.highlights.multiplying = cells,
            MatrixSlot::Result => {}
        }
    }

    /// Swap in a new matrix for `slot` and commit a snapshot
    fn replace(&mut self, slot: MatrixSlot, matrix: Matrix, modified_cells: Vec<(usize, usize)>) -> Vec<Event> {
        match slot {
            MatrixSlot::Multiplying => self.multiplying = matrix,
            _ => self.main = matrix,
        }
        self.set_highlights(slot, modified_cells.clone());
        vec![Event::MatrixReplaced { slot, modified_cells }, self.commit()]
    }

    /// Both matrices are recorded so that undo reverses edits to either
    fn entry(&self) -> HistoryEntry {
        HistoryEntry::with_multiplying(self.main.clone(), self.multiplying.clone())
            .showing_multiplying(self.multiplication_mode)
    }

    fn commit(&mut self) -> Event {
        let index = self.history.commit(self.entry());
        self.coalesce_resize = false;
        debug!(index, entries = self.history.len(), "history committed");
        Event::HistoryCommitted { index }
    }

    fn restore(&mut self, entry: HistoryEntry) -> Vec<Event> {
        self.main = entry.matrix;
        let mut events = vec![Event::MatrixReplaced { slot: MatrixSlot::Main, modified_cells: Vec::new() }];
        if let Some(multiplying) = entry.multiplying {
            self.multiplying = multiplying;
            events.push(Event::MatrixReplaced { slot: MatrixSlot::Multiplying, modified_cells: Vec::new() });
        }
        self.highlights = Highlights::default();
        self.coalesce_resize = false;
        events
    }
}

impl<M> Default for Playground<M> {
    fn default() -> Self {
        Self::new(PlaygroundConfig::default())
    }
}

/// Coordinates where two same-shaped matrices differ; every cell when the
/// shapes differ
fn changed_cells(before: &Matrix, after: &Matrix) -> Vec<(usize, usize)> {
    let same_shape = before.rows() == after.rows() && before.columns() == after.columns();
    let mut cells = Vec::new();
    for (i, row) in after.data().iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            if !same_shape || before.get(i, j) != Some(cell) {
                cells.push((i, j));
            }
        }
    }
    cells
}
