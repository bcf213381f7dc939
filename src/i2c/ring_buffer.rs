// Licensed under the Apache-2.0 license

//! Fixed-capacity byte FIFO shared between interrupt and application context.
//!
//! One side only ever pushes and moves `head`, the other only pops and moves
//! `tail`. `head` is the slot most recently written, `tail` the slot most
//! recently read, so the buffer is empty when they are equal and one slot is
//! always left unused: a buffer of `N` slots holds at most `N - 1` bytes.

/// Single-producer/single-consumer byte ring of `N` slots.
///
/// `N` must be a power of two no smaller than 2; this is checked at compile
/// time when the buffer is first used.
#[derive(Clone)]
pub struct RingBuffer<const N: usize> {
    buf: [u8; N],
    head: usize,
    tail: usize,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    const MASK: usize = {
        assert!(N >= 2, "ring buffer needs at least two slots");
        assert!(N.is_power_of_two(), "ring buffer size must be a power of two");
        N - 1
    };

    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            head: 0,
            tail: 0,
        }
    }

    /// Append a byte. Returns `false` and leaves the buffer untouched when full.
    pub fn push(&mut self, byte: u8) -> bool {
        let next = (self.head + 1) & Self::MASK;
        if next == self.tail {
            return false;
        }
        if let Some(slot) = self.buf.get_mut(next) {
            *slot = byte;
        }
        self.head = next;
        true
    }

    /// Remove the oldest byte.
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        self.tail = (self.tail + 1) & Self::MASK;
        self.buf.get(self.tail).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        (self.head + 1) & Self::MASK == self.tail
    }

    /// Number of bytes waiting to be popped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.wrapping_sub(self.tail) & Self::MASK
    }

    /// Usable capacity, one less than the slot count.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        Self::MASK
    }

    /// Reset both indices. Stored bytes become unreachable but are not zeroed.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    #[cfg(test)]
    fn indices(&self) -> (usize, usize) {
        (self.head, self.tail)
    }
}
