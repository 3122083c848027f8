//! Snapshot history with backstepping
//!
//! Every committed action appends a full snapshot. Moving back does not
//! drop anything; the entries after the current one are only discarded
//! when a new snapshot is committed from a backstepped position.
//!
//! ```text
//! commit ×2          entries [E0, E1, E2]   backsteps 0   current E2
//! undo               entries [E0, E1, E2]   backsteps 1   current E1
//! commit E2'         entries [E0, E1, E2']  backsteps 0   current E2'
//! ```

use matrixplay_core::PlayError;
use matrixplay_matrix::Matrix;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One snapshot of the playground
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub matrix: Matrix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplying: Option<Matrix>,
    #[serde(default)]
    pub show_multiplying: bool,
    /// Milliseconds since the Unix epoch
    pub time: u64,
}

impl HistoryEntry {
    /// Snapshot of a main matrix alone, stamped now
    pub fn new(matrix: Matrix) -> Self {
        Self {
            matrix,
            multiplying: None,
            show_multiplying: false,
            time: now_millis(),
        }
    }

    /// Snapshot taken while both matrices are on screen
    pub fn with_multiplying(matrix: Matrix, multiplying: Matrix) -> Self {
        Self {
            multiplying: Some(multiplying),
            show_multiplying: true,
            ..Self::new(matrix)
        }
    }

    /// Builder: whether the multiplying matrix was on screen
    pub fn showing_multiplying(mut self, shown: bool) -> Self {
        self.show_multiplying = shown;
        self
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Ordered snapshots plus a cursor counted from the newest entry
///
/// Invariant: `entries` is never empty and `backsteps < entries.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
    backsteps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

impl History {
    pub fn new(initial: HistoryEntry) -> Self {
        Self { entries: vec![initial], backsteps: 0, limit: None }
    }

    /// Keep at most `limit` entries, evicting the oldest; a limit of 0 is
    /// treated as 1
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|l| l.max(1));
        self.evict();
        self
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: history holds at least one entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn backsteps(&self) -> usize {
        self.backsteps
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn current_index(&self) -> usize {
        self.entries.len() - 1 - self.backsteps
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.current_index()]
    }

    pub fn latest(&self) -> &HistoryEntry {
        &self.entries[self.entries.len() - 1]
    }

    pub fn can_undo(&self) -> bool {
        self.current_index() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.backsteps > 0
    }

    /// Append a snapshot after the current entry, discarding any entries
    /// that were backstepped over. Returns the index of the new entry.
    pub fn commit(&mut self, entry: HistoryEntry) -> usize {
        if self.backsteps > 0 {
            let keep = self.current_index() + 1;
            self.entries.truncate(keep);
            self.backsteps = 0;
        }
        self.entries.push(entry);
        self.evict();
        self.entries.len() - 1
    }

    /// Overwrite the newest entry in place; the cursor is not moved
    pub fn replace_latest(&mut self, entry: HistoryEntry) -> usize {
        let last = self.entries.len() - 1;
        self.entries[last] = entry;
        last
    }

    /// Move the cursor to an absolute entry index
    pub fn backstep_to(&mut self, index: usize) -> Result<&HistoryEntry, PlayError> {
        if index >= self.entries.len() {
            return Err(PlayError::index_out_of_bounds(format!(
                "history entry {} of {}",
                index,
                self.entries.len()
            )));
        }
        self.backsteps = self.entries.len() - 1 - index;
        Ok(&self.entries[index])
    }

    /// Step one entry back; false at the oldest entry
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.backsteps += 1;
        true
    }

    /// Step one entry forward; false at the newest entry
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.backsteps -= 1;
        true
    }

    /// Drop everything except the current entry
    pub fn clear(&mut self) {
        let current = self.entries.swap_remove(self.current_index());
        self.entries = vec![current];
        self.backsteps = 0;
    }

    fn evict(&mut self) {
        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
                self.backsteps = self.backsteps.min(self.entries.len() - 1);
            }
        }
    }
}
