use flowsim_core::{Amount, AssetSide, Tick};

/// Port for tick <-> price conversion
pub trait TickOracle: Send + Sync {
    /// Price of one unit of `side` at `tick`, expressed in the other asset
    fn price(&self, tick: Tick, side: AssetSide) -> Amount;

    /// Approximate inverse of `price(_, AssetSide::Base)`
    fn tick_for_price(&self, price: Amount) -> Tick;
}
