//! History module - bounded undo/redo ring buffer
//!
//! Each write records a full copy of the state as it was *before* the write.
//! Undo swaps the live state with the entry under the cursor and steps the
//! cursor back; the swapped-out live state stays in that slot so redo can swap
//! it back in. Recording from a non-tip position truncates the redo tail.
//!
//! Full-copy history is cheap for the small grids this game uses (up to about
//! 10x10); capacity is bounded so memory stays flat over long sessions.

use std::collections::VecDeque;
use std::mem;

/// Bounded history of pre-mutation snapshots
#[derive(Debug, Clone)]
pub struct History<S> {
    entries: VecDeque<S>,
    /// Most recent undoable entry; `None` when nothing can be undone
    index: Option<usize>,
    capacity: usize,
}

impl<S> History<S> {
    /// Create an empty history holding at most `capacity` snapshots (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            index: None,
            capacity,
        }
    }

    /// Record the state as it was before a write
    pub fn record(&mut self, previous: S) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push_back(previous);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.index = Some(self.entries.len() - 1);
    }

    /// Step back one write, swapping `current` with the recorded snapshot.
    ///
    /// Returns false (and leaves `current` alone) when there is nothing to undo.
    pub fn undo(&mut self, current: &mut S) -> bool {
        let Some(i) = self.index else {
            return false;
        };
        mem::swap(&mut self.entries[i], current);
        self.index = i.checked_sub(1);
        true
    }

    /// Step forward one write previously undone
    pub fn redo(&mut self, current: &mut S) -> bool {
        let next = self.index.map_or(0, |i| i + 1);
        if next >= self.entries.len() {
            return false;
        }
        mem::swap(&mut self.entries[next], current);
        self.index = Some(next);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.index.map_or(0, |i| i + 1) < self.entries.len()
    }

    /// Drop every entry and reset the cursor
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }

    /// Cursor position (`None` is the empty / fully-undone position)
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Apply `n` writes of values 1..=n, recording each previous value
    fn written(n: u32) -> (History<u32>, u32) {
        let mut history = History::new(50);
        let mut state = 0;
        for value in 1..=n {
            history.record(state);
            state = value;
        }
        (history, state)
    }

    #[test]
    fn test_undo_then_redo() {
        let (mut history, mut state) = written(5);
        assert_eq!(history.index(), Some(4));

        assert!(history.undo(&mut state));
        assert_eq!(state, 4);
        assert!(history.redo(&mut state));
        assert_eq!(state, 5);
        assert!(!history.redo(&mut state));
    }

    #[test]
    fn test_undo_to_start() {
        let (mut history, mut state) = written(3);
        while history.undo(&mut state) {}
        assert_eq!(state, 0);
        assert_eq!(history.index(), None);
        assert!(history.can_redo());

        history.redo(&mut state);
        history.redo(&mut state);
        history.redo(&mut state);
        assert_eq!(state, 3);
    }

    #[test]
    fn test_write_after_undo_truncates_redo() {
        let (mut history, mut state) = written(4);
        history.undo(&mut state);
        history.undo(&mut state);
        assert_eq!(state, 2);

        history.record(state);
        state = 10;
        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());

        history.undo(&mut state);
        assert_eq!(state, 2);
    }

    #[test]
    fn test_capacity_bound() {
        let mut history = History::new(3);
        let mut state = 0;
        for value in 1..=10 {
            history.record(state);
            state = value;
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), Some(2));

        while history.undo(&mut state) {}
        // Oldest surviving snapshot is the state before write 8.
        assert_eq!(state, 7);
    }

    #[test]
    fn test_clear() {
        let (mut history, mut state) = written(2);
        history.clear();
        assert!(history.is_empty());
        assert!(!history.undo(&mut state));
        assert_eq!(state, 2);
    }
}
