//! Two-level ping-pong storage.
//!
//! The oscillator update needs the state at two adjacent time levels. Rather
//! than copying, the newer level is written over the older one and the two
//! roles are exchanged by [`DoubleBuffer::advance`].

/// A pair of buffers with a "current" and a "previous" role.
#[derive(Debug, Clone)]
pub struct DoubleBuffer<B> {
    buffers: [B; 2],
    current: usize,
}

impl<B> DoubleBuffer<B> {
    pub fn new(previous: B, current: B) -> Self {
        Self {
            buffers: [previous, current],
            current: 1,
        }
    }

    /// The newer time level.
    pub fn current(&self) -> &B {
        &self.buffers[self.current]
    }

    /// The older time level.
    pub fn previous(&self) -> &B {
        &self.buffers[1 - self.current]
    }

    pub fn current_mut(&mut self) -> &mut B {
        &mut self.buffers[self.current]
    }

    pub fn previous_mut(&mut self) -> &mut B {
        &mut self.buffers[1 - self.current]
    }

    /// Mutable access to both levels at once, as `(previous, current)`.
    pub fn split_mut(&mut self) -> (&mut B, &mut B) {
        let [first, second] = &mut self.buffers;
        if self.current == 1 {
            (first, second)
        } else {
            (second, first)
        }
    }

    /// Exchange the roles: the previous buffer becomes current.
    ///
    /// Called once the previous buffer has been overwritten with the next
    /// time level.
    pub fn advance(&mut self) {
        self.current = 1 - self.current;
    }

    /// Consume the pair, returning `(previous, current)`.
    pub fn into_parts(self) -> (B, B) {
        let [first, second] = self.buffers;
        if self.current == 1 {
            (first, second)
        } else {
            (second, first)
        }
    }
}
