use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::Tick;

/// Inclusive tick band bounding where trades are expected to land for the day
///
/// Derived from the pivot tick and volatility; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCorridor {
    pub left_tick: Tick,
    pub right_tick: Tick,
}

impl PriceCorridor {
    pub fn new(left_tick: Tick, right_tick: Tick) -> Self {
        Self {
            left_tick,
            right_tick,
        }
    }

    /// Number of ticks covered, both ends included
    pub fn width(&self) -> i64 {
        self.right_tick as i64 - self.left_tick as i64 + 1
    }

    pub fn contains(&self, tick: Tick) -> bool {
        self.left_tick <= tick && tick <= self.right_tick
    }

    /// The whole band lies strictly above `tick`
    pub fn is_above(&self, tick: Tick) -> bool {
        self.left_tick > tick
    }

    /// The whole band lies strictly below `tick`
    pub fn is_below(&self, tick: Tick) -> bool {
        self.right_tick < tick
    }
}

impl fmt::Display for PriceCorridor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left_tick, self.right_tick)
    }
}
