//! Multi-step selection protocol
//!
//! An operation collects its operands one user action at a time:
//!
//! ```text
//! Idle ──start──▶ AwaitingSelection ──select×n──▶ AwaitingScalar ──scalar──▶ ready
//!                        │                               │
//!                        └───────── select×n ────────────┴──────────────────▶ ready
//! ```
//!
//! `Protocol` only tracks the pending operation; running it against a
//! matrix and committing the result is the caller's job.

use matrixplay_core::{parse_scalar, PlayError, Scalar};
use matrixplay_matrix::Matrix;
use matrixplay_ops::{validate_index, OperationKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which matrix of the playground an action addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixSlot {
    Main,
    Multiplying,
    /// Product shown in multiplication mode; read-only
    Result,
}

impl MatrixSlot {
    pub fn name(&self) -> &'static str {
        match self {
            MatrixSlot::Main => "main",
            MatrixSlot::Multiplying => "multiplying",
            MatrixSlot::Result => "result",
        }
    }
}

impl fmt::Display for MatrixSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatrixSlot {
    type Err = PlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "main" | "m" => Ok(MatrixSlot::Main),
            "multiplying" | "other" | "x" => Ok(MatrixSlot::Multiplying),
            "result" | "r" => Ok(MatrixSlot::Result),
            other => Err(PlayError::parse_error(format!("unknown matrix '{}'", other))
                .with_suggestion("Use main, multiplying or result")),
        }
    }
}

/// An operation being assembled
///
/// `M` is whatever handle the caller wants back for each selection when
/// the operation is cancelled (highlighted widgets, labels, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation<M> {
    pub kind: OperationKind,
    pub target: Option<MatrixSlot>,
    pub selection: Vec<usize>,
    pub scalar: Option<Scalar>,
    pub markers: Vec<M>,
}

impl<M> Operation<M> {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            target: None,
            selection: Vec::new(),
            scalar: None,
            markers: Vec::new(),
        }
    }

    /// Index into the kind's instruction list for the next step
    pub fn step(&self) -> usize {
        self.selection.len() + usize::from(self.scalar.is_some())
    }

    pub fn instruction(&self) -> &'static str {
        self.kind.meta().instruction(self.step())
    }

    pub fn selections_complete(&self) -> bool {
        self.selection.len() >= self.kind.meta().selection_size
    }

    /// All operands are present
    pub fn is_ready(&self) -> bool {
        self.selections_complete() && (!self.kind.meta().requires_scalar || self.scalar.is_some())
    }
}

/// Where the protocol currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolState {
    Idle,
    AwaitingSelection,
    AwaitingScalar,
}

/// Notification emitted by playground calls, in order of occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The prompt shown to the user changed; `None` once nothing is pending
    InstructionChanged { instruction: Option<String> },
    MatrixReplaced { slot: MatrixSlot, modified_cells: Vec<(usize, usize)> },
    HistoryCommitted { index: usize },
    OperationCancelled,
}

impl Event {
    pub(crate) fn instruction(text: &str) -> Self {
        Event::InstructionChanged { instruction: Some(text.to_string()) }
    }

    pub(crate) fn idle() -> Self {
        Event::InstructionChanged { instruction: None }
    }
}

/// Result of a selection
#[derive(Debug)]
pub enum Advance<M> {
    /// More input is needed; carries the next prompt
    Waiting(&'static str),
    /// All operands are in; the operation has left the protocol
    Ready(Operation<M>),
}

/// Holder of at most one pending operation
#[derive(Debug)]
pub struct Protocol<M> {
    pending: Option<Operation<M>>,
}

impl<M> Default for Protocol<M> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<M> Protocol<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ProtocolState {
        match &self.pending {
            None => ProtocolState::Idle,
            Some(op) if op.selections_complete() => ProtocolState::AwaitingScalar,
            Some(_) => ProtocolState::AwaitingSelection,
        }
    }

    pub fn pending(&self) -> Option<&Operation<M>> {
        self.pending.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    pub fn instruction(&self) -> Option<&'static str> {
        self.pending.as_ref().map(|op| op.instruction())
    }

    /// Begin collecting operands for `kind`
    pub fn start(&mut self, kind: OperationKind) -> Result<&'static str, PlayError> {
        if let Some(op) = &self.pending {
            return Err(PlayError::operation_in_progress(op.kind.name()));
        }
        let op = Operation::new(kind);
        let instruction = op.instruction();
        self.pending = Some(op);
        Ok(instruction)
    }

    /// Record one selected row/column index on `matrix`, which must be the
    /// matrix currently held in `slot`
    ///
    /// A rejected selection leaves the pending operation untouched.
    pub fn select(
        &mut self,
        slot: MatrixSlot,
        matrix: &Matrix,
        index: usize,
        marker: M,
    ) -> Result<Advance<M>, PlayError> {
        let op = match self.pending.as_mut() {
            Some(op) => op,
            None => return Err(PlayError::no_operation()),
        };
        let name = op.kind.name();

        if op.selections_complete() {
            return Err(PlayError::invalid_selection("the operation is waiting for a scalar")
                .in_operation(name));
        }
        if slot == MatrixSlot::Result {
            return Err(PlayError::invalid_selection("the result matrix is read-only")
                .in_operation(name));
        }
        if let Some(target) = op.target {
            if target != slot {
                return Err(PlayError::invalid_selection(format!(
                    "the operation is bound to the {} matrix, not {}",
                    target, slot
                ))
                .in_operation(name));
            }
        }
        validate_index(op.kind, matrix, op.selection.len(), index)
            .map_err(|e| e.in_operation(name))?;

        op.target = Some(slot);
        op.selection.push(index);
        op.markers.push(marker);

        if op.is_ready() {
            return self.take_ready();
        }
        Ok(Advance::Waiting(op.instruction()))
    }

    /// Supply the scalar operand as text
    ///
    /// A parse failure abandons the operation.
    pub fn provide_scalar(&mut self, text: &str) -> Result<Operation<M>, PlayError> {
        match self.state() {
            ProtocolState::Idle => return Err(PlayError::no_operation()),
            ProtocolState::AwaitingSelection => {
                let name = self.pending.as_ref().map_or("", |op| op.kind.name());
                return Err(PlayError::invalid_selection("the operation is waiting for a selection")
                    .in_operation(name));
            }
            ProtocolState::AwaitingScalar => {}
        }

        let mut op = match self.pending.take() {
            Some(op) => op,
            None => return Err(PlayError::no_operation()),
        };
        match parse_scalar(text) {
            Ok(scalar) => {
                op.scalar = Some(scalar);
                Ok(op)
            }
            Err(e) => Err(PlayError::from(e).in_operation(op.kind.name())),
        }
    }

    /// Abandon the pending operation, handing back its markers
    pub fn cancel(&mut self) -> Result<Vec<M>, PlayError> {
        match self.pending.take() {
            Some(op) => Ok(op.markers),
            None => Err(PlayError::no_operation()),
        }
    }

    fn take_ready(&mut self) -> Result<Advance<M>, PlayError> {
        self.pending
            .take()
            .map(Advance::Ready)
            .ok_or_else(PlayError::no_operation)
    }
}
