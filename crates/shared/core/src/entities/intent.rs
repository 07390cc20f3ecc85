use serde::{Deserialize, Serialize};

use super::Direction;
use crate::values::Amount;

/// A single synthetic trade, produced by the generator and consumed by one swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub direction: Direction,
    /// Amount paid in, denominated in the direction's input asset
    pub quantity_in: Amount,
}

impl TradeIntent {
    pub fn new(direction: Direction, quantity_in: Amount) -> Self {
        Self {
            direction,
            quantity_in,
        }
    }
}
