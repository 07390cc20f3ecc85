//! Trailing and intraday sample windows

use flowsim_core::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of completed days kept by the trailing windows
///
/// Together with the day in progress this gives a 30-day average.
pub const TRAILING_DEPTH: usize = 29;

/// Fixed-depth FIFO of per-day totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundedWindow {
    values: VecDeque<Amount>,
    depth: usize,
}

impl BoundedWindow {
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            values: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// Append a value, returning the evicted oldest one when full
    pub fn push(&mut self, value: Amount) -> Option<Amount> {
        let evicted = if self.values.len() >= self.depth {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.depth
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    // Recomputed per call: 29 exact additions, no drift from subtract-on-evict
    pub fn sum(&self) -> Amount {
        self.values.iter().sum()
    }

    pub fn mean(&self) -> Option<Amount> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.sum() / Decimal::from(self.values.len() as u64))
    }

    /// Oldest first
    pub fn values(&self) -> impl Iterator<Item = &Amount> + '_ {
        self.values.iter()
    }

    pub fn last(&self) -> Option<Amount> {
        self.values.back().copied()
    }
}

impl Default for BoundedWindow {
    fn default() -> Self {
        Self::new(TRAILING_DEPTH)
    }
}

/// Unbounded samples cleared at each day rollover
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResettableWindow {
    values: Vec<Amount>,
    /// Running sum for O(1) mean updates
    sum: Amount,
}

impl ResettableWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Amount) {
        self.values.push(value);
        self.sum += value;
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.sum = Decimal::ZERO;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> Amount {
        self.sum
    }

    /// Arithmetic mean, zero when no samples were taken today
    pub fn mean(&self) -> Amount {
        if self.values.is_empty() {
            return Decimal::ZERO;
        }
        self.sum / Decimal::from(self.values.len() as u64)
    }

    pub fn values(&self) -> &[Amount] {
        &self.values
    }
}
