//! Bounded undo/redo history of element-list snapshots.
//!
//! Each frame is the full element list as it was immediately before a
//! mutation. The canvas and the selection are not part of a frame.

use std::collections::VecDeque;

use crate::Element;

/// Default number of undo frames kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Snapshot of the element list.
pub type Frame = Vec<Element>;

/// Linear undo/redo history.
#[derive(Debug, Clone)]
pub struct History {
    /// Oldest frame at the front, most recent at the back.
    undo_stack: VecDeque<Frame>,
    /// Next frame to redo at the back.
    redo_stack: Vec<Frame>,
    /// Maximum undo frames kept.
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history keeping at most `limit` undo frames.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(limit.min(64)),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Record the element list as it was before a mutation.
    ///
    /// Clears the redo stack and evicts the oldest frames beyond the limit.
    pub fn record(&mut self, before: Frame) {
        self.redo_stack.clear();
        self.push_undo(before);
    }

    /// Step back: returns the frame to restore, remembering `current` for redo.
    ///
    /// Returns `None` and keeps `current` untouched when there is nothing to undo.
    pub fn undo(&mut self, current: Frame) -> Option<Frame> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward: returns the frame to restore, remembering `current` for undo.
    pub fn redo(&mut self, current: Frame) -> Option<Frame> {
        let next = self.redo_stack.pop()?;
        self.push_undo(current);
        Some(next)
    }

    fn push_undo(&mut self, frame: Frame) {
        self.undo_stack.push_back(frame);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo frames available.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo frames available.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all frames.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
