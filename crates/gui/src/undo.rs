//! Undo/Redo system for the authoring tool.
//!
//! Stores whole-book snapshots before each action; restoring one triggers
//! a full book resync through the navigator. Maximum 50 states to limit
//! memory usage.

use std::collections::VecDeque;

use storybook_engine::StoryBook;

/// Maximum number of undo states to keep in memory.
const MAX_UNDO_STATES: usize = 50;

/// Manages undo/redo history of book snapshots.
#[derive(Clone, Debug, Default)]
pub struct UndoStack {
    /// Past states, most recent at the back.
    history: VecDeque<StoryBook>,
    /// States available for redo, most recent at the back.
    redo_stack: VecDeque<StoryBook>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the current state before an action.
    ///
    /// # Contract
    /// - Clears the redo stack (a new action invalidates redo).
    /// - Limits history to `MAX_UNDO_STATES`.
    pub fn push(&mut self, state: StoryBook) {
        self.redo_stack.clear();
        self.history.push_back(state);
        while self.history.len() > MAX_UNDO_STATES {
            self.history.pop_front();
        }
    }

    /// Undoes the last action, returning the state to restore.
    pub fn undo(&mut self, current: StoryBook) -> Option<StoryBook> {
        let previous = self.history.pop_back()?;
        self.redo_stack.push_back(current);
        Some(previous)
    }

    /// Redoes the last undone action, returning the state to restore.
    pub fn redo(&mut self, current: StoryBook) -> Option<StoryBook> {
        let next = self.redo_stack.pop_back()?;
        self.history.push_back(current);
        Some(next)
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.redo_stack.clear();
    }

    #[inline]
    pub fn undo_count(&self) -> usize {
        self.history.len()
    }
}
