use std::collections::VecDeque;

use crate::buffer::BufferRef;

pub const MIN_CAPACITY: usize = 5;
pub const MAX_CAPACITY: usize = 100;
pub const DEFAULT_CAPACITY: usize = 50;

/// Clamp a requested history capacity into the supported range
pub fn clamp_capacity(n: usize) -> usize {
    n.clamp(MIN_CAPACITY, MAX_CAPACITY)
}

/// Bounded, linear undo/redo timeline of full-buffer snapshots.
///
/// `cursor` points at the snapshot currently shown. Snapshots after the
/// cursor form the redo branch, which any push discards.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    snapshots: VecDeque<BufferRef>,
    cursor: usize,
    capacity: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryStore {
    /// Creates an empty history; `capacity` is clamped to 5..=100
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            cursor: 0,
            capacity: clamp_capacity(capacity),
        }
    }

    /// Record a new state after the cursor, dropping the redo branch and the
    /// oldest snapshots beyond capacity.
    pub fn push(&mut self, buffer: BufferRef) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push_back(buffer);
        self.cursor = self.snapshots.len() - 1;

        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            self.cursor -= 1;
        }
    }

    /// Overwrite the snapshot at the cursor. Returns false if history is empty.
    pub fn replace_top(&mut self, buffer: BufferRef) -> bool {
        match self.snapshots.get_mut(self.cursor) {
            Some(slot) => {
                *slot = buffer;
                true
            }
            None => false,
        }
    }

    /// Step back one snapshot; `None` at the oldest entry
    pub fn undo(&mut self) -> Option<BufferRef> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step forward one snapshot; `None` when there is nothing to redo
    pub fn redo(&mut self) -> Option<BufferRef> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// Change the capacity (clamped to 5..=100), evicting the oldest snapshots
    /// if needed. Returns the capacity actually applied.
    ///
    /// The snapshot under the cursor is never evicted: once eviction reaches
    /// it, the remaining excess comes off the redo end instead. With the cursor
    /// near the start this keeps newer snapshots out of the trimmed store where
    /// a plain oldest-first trim would have dropped the viewed one.
    pub fn set_capacity(&mut self, n: usize) -> usize {
        self.capacity = clamp_capacity(n);
        let excess = self.snapshots.len().saturating_sub(self.capacity);
        if excess > 0 {
            let from_front = excess.min(self.cursor);
            self.snapshots.drain(..from_front);
            self.cursor -= from_front;
            self.snapshots.truncate(self.capacity);
        }
        self.capacity
    }

    /// The snapshot at the cursor
    pub fn current(&self) -> Option<BufferRef> {
        self.snapshots.get(self.cursor).cloned()
    }

    pub fn get(&self, index: usize) -> Option<&BufferRef> {
        self.snapshots.get(index)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every snapshot
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use std::sync::Arc;

    fn snap(v: u8) -> BufferRef {
        PixelBuffer::filled(1, 1, [v, v, v, 255]).unwrap().into_ref()
    }

    #[test]
    fn test_empty_history() {
        let mut history = HistoryStore::default();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(!history.replace_top(snap(1)));
        assert!(history.current().is_none());
    }

    #[test]
    fn test_replace_top_keeps_cursor_and_length() {
        let mut history = HistoryStore::default();
        history.push(snap(1));
        history.push(snap(2));

        let replacement = snap(3);
        assert!(history.replace_top(replacement.clone()));

        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
        assert!(Arc::ptr_eq(&history.current().unwrap(), &replacement));
    }

    #[test]
    fn test_capacity_is_clamped() {
        assert_eq!(HistoryStore::new(1).capacity(), MIN_CAPACITY);
        assert_eq!(HistoryStore::new(1000).capacity(), MAX_CAPACITY);
        let mut history = HistoryStore::default();
        assert_eq!(history.set_capacity(0), 5);
    }

    #[test]
    fn test_shrink_keeps_viewed_snapshot_when_cursor_is_old() {
        let mut history = HistoryStore::new(20);
        let snaps: Vec<_> = (0..20).map(snap).collect();
        for s in &snaps {
            history.push(s.clone());
        }
        for _ in 0..17 {
            history.undo();
        }
        assert_eq!(history.cursor(), 2);

        history.set_capacity(5);

        assert_eq!(history.len(), 5);
        assert_eq!(history.cursor(), 0);
        assert!(Arc::ptr_eq(&history.current().unwrap(), &snaps[2]));
        assert!(history.can_redo());
    }
}
