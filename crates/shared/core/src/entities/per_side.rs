use serde::{Deserialize, Serialize};

use super::AssetSide;
use crate::values::Amount;

/// A value held once per asset of the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub base: T,
    pub quote: T,
}

impl<T> PerSide<T> {
    pub fn new(base: T, quote: T) -> Self {
        Self { base, quote }
    }

    pub fn get(&self, side: AssetSide) -> &T {
        match side {
            AssetSide::Base => &self.base,
            AssetSide::Quote => &self.quote,
        }
    }

    pub fn get_mut(&mut self, side: AssetSide) -> &mut T {
        match side {
            AssetSide::Base => &mut self.base,
            AssetSide::Quote => &mut self.quote,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(AssetSide, T) -> U) -> PerSide<U> {
        PerSide {
            base: f(AssetSide::Base, self.base),
            quote: f(AssetSide::Quote, self.quote),
        }
    }
}

/// Capital accounting for one side of the pool
///
/// Each side is denominated in its own asset: the base side's
/// `actual_reserve` is base, its `respective_reserve` is the quote it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideStats {
    /// Own asset still held
    pub actual_reserve: Amount,
    /// Own asset recovered if the held counter-asset were swapped back
    pub expected_reserve_from_exit: Amount,
    /// Own asset originally deposited
    pub deposited_reserve: Amount,
    /// Counter-asset held (inventory pending rebalancing)
    pub respective_reserve: Amount,
}

impl SideStats {
    /// Reserve plus expected-from-exit, in the side's own asset
    pub fn total_reserve(&self) -> Amount {
        self.actual_reserve + self.expected_reserve_from_exit
    }

    /// Gain over the deposit, in the side's own asset
    pub fn profit(&self) -> Amount {
        self.total_reserve() - self.deposited_reserve
    }
}
