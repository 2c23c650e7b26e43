//! Bounded undo/redo stacks of whole-document snapshots.

use std::collections::VecDeque;

use crate::block::{Block, BlockId};

use super::state::DocumentDetails;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// The undoable part of the editor state.
///
/// Clipboard, preview mode and the id sequence are not part of it, so undo
/// never resurrects an id that was already handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub(super) components: Vec<Block>,
    pub(super) selected: Option<BlockId>,
    pub(super) dirty: bool,
    pub(super) details: DocumentDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub struct History {
    past: VecDeque<Snapshot>,
    /// Top of the redo stack is the last element.
    future: Vec<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit,
        }
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Record the state before a new edit. Discards the redo branch and
    /// evicts the oldest entry once the limit is exceeded.
    pub(super) fn record(&mut self, before: Snapshot) {
        self.future.clear();
        if self.limit == 0 {
            return;
        }
        self.past.push_back(before);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }

    /// Step back: returns the snapshot to restore, keeping `current` for redo.
    pub(super) fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward: returns the snapshot to restore, keeping `current` for undo.
    pub(super) fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.past.push_back(current);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        Some(next)
    }

    pub(super) fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(dirty: bool, name: &str) -> Snapshot {
        Snapshot {
            components: Vec::new(),
            selected: None,
            dirty,
            details: DocumentDetails {
                file_name: name.to_string(),
                ..DocumentDetails::default()
            },
        }
    }

    #[test]
    fn test_record_evicts_oldest_past_entry() {
        let mut history = History::with_limit(2);
        history.record(snapshot(false, "a"));
        history.record(snapshot(false, "b"));
        history.record(snapshot(false, "c"));
        assert_eq!(history.undo_depth(), 2);
        let restored = history.undo(snapshot(true, "d")).unwrap();
        assert_eq!(restored.details.file_name, "c");
        let restored = history.undo(restored).unwrap();
        assert_eq!(restored.details.file_name, "b");
        assert!(history.undo(restored).is_none());
    }

    #[test]
    fn test_record_discards_redo_branch() {
        let mut history = History::default();
        history.record(snapshot(false, "a"));
        history.undo(snapshot(true, "b")).unwrap();
        assert!(history.can_redo());
        history.record(snapshot(false, "a"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_zero_limit_keeps_nothing() {
        let mut history = History::with_limit(0);
        history.record(snapshot(false, "a"));
        assert!(!history.can_undo());
    }
}
