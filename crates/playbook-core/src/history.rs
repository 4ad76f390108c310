//! Bounded undo history of whole frame-sequence snapshots.

use crate::frame::FrameSequence;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 20;

/// Undo stack. There is no redo: a popped snapshot is gone.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    stack: Vec<FrameSequence>,
    capacity: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::with_capacity(MAX_UNDO_HISTORY)
    }

    /// A history holding at most `capacity` snapshots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record the sequence as it is right before a mutation.
    pub fn push(&mut self, frames: &FrameSequence) {
        self.stack.push(frames.clone());

        // Evict the oldest entries once over capacity
        if self.stack.len() > self.capacity {
            let overflow = self.stack.len() - self.capacity;
            self.stack.drain(..overflow);
        }
    }

    /// Pop the most recent snapshot.
    pub fn pop(&mut self) -> Option<FrameSequence> {
        self.stack.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    fn sequence_of(len: usize) -> FrameSequence {
        FrameSequence::from_frames(vec![Frame::new(); len])
    }

    #[test]
    fn test_push_pop() {
        let mut history = UndoHistory::new();
        assert!(!history.can_undo());
        history.push(&sequence_of(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.pop().map(|s| s.len()), Some(2));
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = UndoHistory::new();
        for len in 1..=25 {
            history.push(&sequence_of(len));
        }
        assert_eq!(history.len(), MAX_UNDO_HISTORY);

        let mut last = None;
        while let Some(seq) = history.pop() {
            last = Some(seq.len());
        }
        // Snapshots 1..=5 were evicted
        assert_eq!(last, Some(6));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut history = UndoHistory::with_capacity(0);
        history.push(&sequence_of(1));
        history.push(&sequence_of(2));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.pop().map(|s| s.len()), Some(2));
    }
}
