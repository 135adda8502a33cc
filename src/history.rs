//! Edit history (undo/redo) over document snapshots.
//!
//! Because every mutation produces a new [`TextModel`], an undo entry is
//! simply the snapshot from before the edit together with its selection.

use crate::model::{Selection, TextModel};

/// A document state that can be restored
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub model: TextModel,
    pub selection: Selection,
}

impl Snapshot {
    pub fn new(model: TextModel, selection: Selection) -> Self {
        Self { model, selection }
    }
}

/// Edit history with undo/redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a new history with default max size
    pub fn new() -> Self {
        Self::with_max_size(100)
    }

    /// Create a new history with specified max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Record the state before an edit (clears redo stack)
    pub fn push(&mut self, before: Snapshot) {
        self.redo_stack.clear();
        self.undo_stack.push(before);

        // Trim if exceeded max size
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Step back: returns the state to restore, remembering `current` for redo
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward: returns the state to restore, remembering `current` for undo
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    fn snapshot(text: &str) -> Snapshot {
        Snapshot::new(
            TextModel::new(vec![Block::new("a", text)]).unwrap(),
            Selection::collapsed("a", 0),
        )
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = History::new();
        history.push(snapshot("a"));
        history.push(snapshot("ab"));
        assert_eq!(history.undo_count(), 2);
        assert!(!history.can_redo());

        let restored = history.undo(snapshot("abc")).unwrap();
        assert_eq!(restored, snapshot("ab"));
        assert!(history.can_redo());

        let redone = history.redo(restored).unwrap();
        assert_eq!(redone, snapshot("abc"));
        assert!(!history.can_redo());
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_history_push_clears_redo() {
        let mut history = History::new();
        history.push(snapshot("a"));
        history.undo(snapshot("b"));
        assert!(history.can_redo());

        history.push(snapshot("c"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_max_size() {
        let mut history = History::with_max_size(3);
        for i in 0..5 {
            history.push(snapshot(&i.to_string()));
        }
        assert_eq!(history.undo_count(), 3);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut history = History::new();
        assert!(history.undo(snapshot("x")).is_none());
        assert_eq!(history.redo_count(), 0);
    }
}
