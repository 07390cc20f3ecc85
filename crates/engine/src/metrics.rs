//! Metrics snapshot assembled from pool and aggregator state

use crate::day_cycle::{DayCycleAggregator, IntradayKind, TrailingKind};
use flowsim_core::{Amount, AssetSide, PerSide, SideStats, Tick, Timestamp, format_fixed, format_short};
use flowsim_ports::{LiquidityPool, TickOracle};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

const PERCENT: Decimal = dec!(100);
const DAYS_PER_YEAR: Decimal = dec!(365);

/// Per-asset figures, in the asset's own units unless noted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetrics {
    pub reserve: Amount,
    /// Counter-asset held, in the counter-asset
    pub inventory: Amount,
    pub profit: Amount,
    pub profit_percent: Amount,
    pub impermanent_loss_percent: Amount,
}

impl AssetMetrics {
    fn from_stats(stats: &SideStats, impermanent_loss: Amount) -> Self {
        let profit = stats.profit();
        let profit_percent = if stats.deposited_reserve.is_zero() {
            Decimal::ZERO
        } else {
            profit / stats.deposited_reserve * PERCENT
        };

        Self {
            reserve: stats.actual_reserve,
            inventory: stats.respective_reserve,
            profit,
            profit_percent,
            impermanent_loss_percent: impermanent_loss * PERCENT,
        }
    }
}

/// Point-in-time view for the display layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub sampled_at: Timestamp,
    /// Trades executed since start
    pub trades: u64,
    pub day: u32,
    pub current_tick: Tick,
    pub current_price: Amount,
    pub current_fee_factor_percent: Amount,
    /// 30-day average fees over TVL, annualized, in percent
    pub avg_apr: Amount,
    pub avg_volume_30d: Amount,
    pub avg_fees_30d: Amount,
    pub avg_trade_size_intraday: Amount,
    pub avg_slippage_percent_intraday: Amount,
    pub assets: PerSide<AssetMetrics>,
}

impl MetricsSnapshot {
    /// Read-only: neither the pool nor the aggregator is mutated
    pub fn assemble<P, O>(
        pool: &P,
        aggregator: &DayCycleAggregator<O>,
        fee_factor: Amount,
        trades: u64,
        sampled_at: Timestamp,
    ) -> Self
    where
        P: LiquidityPool + ?Sized,
        O: TickOracle,
    {
        let current_tick = pool.cur_tick();
        let avg_fees_30d = aggregator.trailing_average(TrailingKind::Fees);
        let tvl = pool.tvl_quote();
        let avg_apr = if tvl.is_zero() {
            Decimal::ZERO
        } else {
            avg_fees_30d / tvl * PERCENT * DAYS_PER_YEAR
        };

        let stats = pool.stats_by_side();
        let losses = pool.impermanent_loss();
        let assets = PerSide::new(AssetSide::Base, AssetSide::Quote)
            .map(|_, side| AssetMetrics::from_stats(stats.get(side), *losses.get(side)));

        Self {
            sampled_at,
            trades,
            day: aggregator.day(),
            current_tick,
            current_price: aggregator.oracle().price(current_tick, AssetSide::Base),
            current_fee_factor_percent: fee_factor * PERCENT,
            avg_apr,
            avg_volume_30d: aggregator.trailing_average(TrailingKind::Volume),
            avg_fees_30d,
            avg_trade_size_intraday: aggregator.intraday_average(IntradayKind::TradeSize),
            avg_slippage_percent_intraday: aggregator.intraday_average(IntradayKind::Slippage)
                * PERCENT,
            assets,
        }
    }
}

fn write_asset(f: &mut fmt::Formatter<'_>, side: AssetSide, asset: &AssetMetrics) -> fmt::Result {
    write!(
        f,
        "{} {} (inv {}, pnl {}%, IL {}%)",
        side,
        format_short(asset.reserve),
        format_short(asset.inventory),
        format_fixed(asset.profit_percent, 3),
        format_fixed(asset.impermanent_loss_percent, 3),
    )
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} | trades {} | price {} | fee {}% | APR {}% | vol30d {} | fees30d {} | size {} | slip {}% | ",
            self.day,
            self.trades,
            format_fixed(self.current_price, 2),
            format_fixed(self.current_fee_factor_percent, 2),
            format_fixed(self.avg_apr, 2),
            format_short(self.avg_volume_30d),
            format_short(self.avg_fees_30d),
            format_short(self.avg_trade_size_intraday),
            format_fixed(self.avg_slippage_percent_intraday, 4),
        )?;
        write_asset(f, AssetSide::Base, &self.assets.base)?;
        write!(f, " | ")?;
        write_asset(f, AssetSide::Quote, &self.assets.quote)
    }
}
