//! Bounded FIFO history of closed bars.

use std::collections::VecDeque;

use crate::Bar;

/// Minimum number of bars kept per instrument.
pub const MIN_HISTORY: usize = 21;

/// Extra bars retained beyond the lookback window.
pub const HISTORY_PADDING: usize = 5;

/// Returns the history capacity for a lookback of `window_minutes`.
#[must_use]
pub const fn history_capacity(window_minutes: usize) -> usize {
    let padded = window_minutes.saturating_add(HISTORY_PADDING);
    if padded > MIN_HISTORY {
        padded
    } else {
        MIN_HISTORY
    }
}

/// Fixed-capacity ring of closed bars, oldest first.
///
/// Pushing into a full history evicts the oldest bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarHistory {
    bars: VecDeque<Bar>,
    capacity: usize,
}

impl BarHistory {
    /// Creates an empty history holding at most `capacity` bars.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a bar, returning the evicted bar if the history was full.
    pub fn push(&mut self, bar: Bar) -> Option<Bar> {
        let evicted = if self.bars.len() == self.capacity {
            self.bars.pop_front()
        } else {
            None
        };
        self.bars.push_back(bar);
        evicted
    }

    /// Returns the maximum number of retained bars.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of retained bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if no bars are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns true if the next push will evict.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.bars.len() == self.capacity
    }

    /// Iterates bars oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Bar> + ExactSizeIterator {
        self.bars.iter()
    }

    /// Returns the oldest retained bar.
    #[must_use]
    pub fn oldest(&self) -> Option<&Bar> {
        self.bars.front()
    }

    /// Returns the newest retained bar.
    #[must_use]
    pub fn newest(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Returns all closes, oldest first.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Returns the newest `n` closes, oldest first.
    #[must_use]
    pub fn last_closes(&self, n: usize) -> Vec<f64> {
        let skip = self.bars.len().saturating_sub(n);
        self.bars.iter().skip(skip).map(|bar| bar.close).collect()
    }

    /// Removes every bar, keeping the capacity.
    pub fn clear(&mut self) {
        self.bars.clear();
    }
}

impl<'a> IntoIterator for &'a BarHistory {
    type Item = &'a Bar;
    type IntoIter = std::collections::vec_deque::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
