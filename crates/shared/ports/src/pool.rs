use flowsim_core::{Amount, PerSide, SideStats, SwapOutcome, Tick, TradeIntent};

/// Port for the AMM pool the synthetic order flow trades against
///
/// The engine only ever reads from the pool, except through `swap`.
/// Implementations must keep `estimate_impact_ticks` free of side effects.
pub trait LiquidityPool: Send {
    /// Current price tick
    fn cur_tick(&self) -> Tick;

    /// Tick displacement a swap of `intent` would cause (read-only)
    fn estimate_impact_ticks(&self, intent: &TradeIntent) -> u32;

    /// Execute a swap, mutating reserves
    fn swap(&mut self, intent: &TradeIntent) -> SwapOutcome;

    /// Per side: actual reserve plus expected-from-exit, in the side's own asset
    fn reserves(&self) -> PerSide<Amount>;

    /// Original capital per side, immutable after initialization
    fn deposited_reserves(&self) -> PerSide<Amount>;

    /// Total value locked, in the quote asset
    fn tvl_quote(&self) -> Amount;

    /// Impermanent loss per side as a fraction (positive = loss)
    fn impermanent_loss(&self) -> PerSide<Amount>;

    fn stats_by_side(&self) -> PerSide<SideStats>;
}
