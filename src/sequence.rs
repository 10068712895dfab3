//! The Fibonacci recurrence that drives every producer.

use crate::errors::SequenceError;

/// Mutable `(prev, curr)` pair advanced by `next = prev + curr`.
///
/// A fresh sequence is seeded with `(1, 1)`, so the values it yields are
/// 2, 3, 5, 8, 13, ... The state is owned by exactly one generating task and is
/// never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fibonacci {
    prev: i64,
    curr: i64,
    step: u64,
}

impl Fibonacci {
    #[must_use]
    pub fn new() -> Self {
        Fibonacci {
            prev: 1,
            curr: 1,
            step: 0,
        }
    }

    /// Computes the next term and shifts the pair forward.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Overflow`] once the next term no longer fits in
    /// an `i64`. The state is left untouched, so every later call fails the same
    /// way.
    pub fn advance(&mut self) -> Result<i64, SequenceError> {
        let next = self
            .prev
            .checked_add(self.curr)
            .ok_or(SequenceError::Overflow { step: self.step + 1 })?;
        self.prev = self.curr;
        self.curr = next;
        self.step += 1;
        Ok(next)
    }

    /// Number of terms produced so far.
    #[must_use]
    pub fn step(&self) -> u64 {
        self.step
    }
}

impl Default for Fibonacci {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Fibonacci {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().ok()
    }
}

impl std::iter::FusedIterator for Fibonacci {}
