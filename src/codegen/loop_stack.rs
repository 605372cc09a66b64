use super::{label::Label, CodegenError};

/// How many open loops fit before the first growth
pub const INITIAL_CAPACITY: usize = 1000;

/// LIFO of the labels of every currently open loop.
///
/// Growth follows a fixed x1.1 policy rather than whatever `Vec` would pick
/// on its own, so `capacity()` reports the policy's view, not the allocator's.
#[derive(Debug)]
pub struct LoopStack {
    frames: Vec<Label>,
    capacity: usize,
}

impl LoopStack {
    pub fn new() -> Result<LoopStack, CodegenError> {
        LoopStack::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<LoopStack, CodegenError> {
        let mut frames = Vec::new();
        frames
            .try_reserve_exact(capacity)
            .map_err(|_| CodegenError::OutOfMemory { capacity })?;
        Ok(LoopStack { frames, capacity })
    }

    /// `ceil(capacity * 1.1)`, always at least one more than now
    fn grown_capacity(capacity: usize) -> usize {
        let grown = capacity.saturating_add((capacity + 9) / 10);
        grown.max(capacity.saturating_add(1))
    }

    pub fn push(&mut self, label: Label) -> Result<(), CodegenError> {
        if self.frames.len() == self.capacity {
            let capacity = LoopStack::grown_capacity(self.capacity);
            self.frames
                .try_reserve_exact(capacity - self.frames.len())
                .map_err(|_| CodegenError::OutOfMemory { capacity })?;
            self.capacity = capacity;
        }
        self.frames.push(label);
        Ok(())
    }

    /// `None` when there's nothing open, the caller decides what that means
    pub fn pop(&mut self) -> Option<Label> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remaining frames, bottom (outermost) first
    pub fn into_labels(self) -> Vec<Label> {
        self.frames
    }
}
