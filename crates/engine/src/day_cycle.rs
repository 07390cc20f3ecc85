//! Day Cycle & Rolling Aggregator
//!
//! A simulated day ends when its accumulated quote volume reaches the day's
//! target, not after a wall-clock interval. At rollover the day's totals move
//! into the 29-deep trailing windows, intraday samples are dropped, and the
//! target and pivot are re-derived for the next day.

use crate::corridor::CorridorModel;
use crate::window::{BoundedWindow, ResettableWindow, TRAILING_DEPTH};
use flowsim_core::{Amount, PriceCorridor, Tick};
use flowsim_ports::{SimulationResult, TickOracle};
use log::info;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Day target section of the simulation config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayCycleConfig {
    /// Next day's target as a multiple of the quote side's reserve figure
    pub target_multiplier: Amount,
    /// Day 1 target; `None` derives it from the opening reserve figure
    pub initial_target: Option<Amount>,
}

impl Default for DayCycleConfig {
    fn default() -> Self {
        Self {
            target_multiplier: dec!(2.5),
            initial_target: None,
        }
    }
}

impl DayCycleConfig {
    pub fn target_for(&self, quote_side_figure: Amount) -> Amount {
        self.target_multiplier * quote_side_figure
    }
}

/// Live state of the day in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCycle {
    /// Starts at 1, +1 per rollover
    pub day: u32,
    pub accumulated_quote_volume: Amount,
    pub target_quote_volume: Amount,
    pub pivot_tick: Tick,
    pub accumulated_fees: Amount,
}

impl DayCycle {
    fn opening(target: Amount, pivot: Tick) -> Self {
        Self {
            day: 1,
            accumulated_quote_volume: Decimal::ZERO,
            target_quote_volume: target,
            pivot_tick: pivot,
            accumulated_fees: Decimal::ZERO,
        }
    }

    pub fn target_reached(&self) -> bool {
        self.accumulated_quote_volume >= self.target_quote_volume
    }

    /// Fraction of today's target traded so far
    pub fn progress(&self) -> Amount {
        if self.target_quote_volume.is_zero() {
            return Decimal::ONE;
        }
        self.accumulated_quote_volume / self.target_quote_volume
    }
}

/// Daily totals kept for the trailing average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrailingKind {
    Volume,
    Fees,
}

/// Per-trade samples kept for the current day only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntradayKind {
    TradeSize,
    Slippage,
}

/// What changed when a day closed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRollover {
    pub completed_day: u32,
    /// Closing quote volume of the completed day
    pub volume: Amount,
    /// Closing fees of the completed day, in quote
    pub fees: Amount,
    pub next_target: Amount,
    pub next_pivot: Tick,
    pub next_corridor: PriceCorridor,
}

/// Owns the day cycle, its windows and the pivot walk
pub struct DayCycleAggregator<O> {
    oracle: O,
    model: CorridorModel,
    config: DayCycleConfig,
    rng: StdRng,
    cycle: DayCycle,
    corridor: PriceCorridor,
    volume_history: BoundedWindow,
    fee_history: BoundedWindow,
    trade_sizes: ResettableWindow,
    slippages: ResettableWindow,
}

impl<O: TickOracle> DayCycleAggregator<O> {
    /// Open day 1 around `opening_pivot`
    ///
    /// Fails when the model's volatility is narrower than one tick there.
    pub fn new(
        oracle: O,
        model: CorridorModel,
        config: DayCycleConfig,
        opening_pivot: Tick,
        quote_side_figure: Amount,
        rng: StdRng,
    ) -> SimulationResult<Self> {
        let corridor = model.corridor(&oracle, opening_pivot)?;
        let target = config
            .initial_target
            .unwrap_or_else(|| config.target_for(quote_side_figure));

        info!(
            "Day 1 opens: pivot {}, corridor {}, target {}",
            opening_pivot, corridor, target
        );

        Ok(Self {
            oracle,
            model,
            config,
            rng,
            cycle: DayCycle::opening(target, opening_pivot),
            corridor,
            volume_history: BoundedWindow::new(TRAILING_DEPTH),
            fee_history: BoundedWindow::new(TRAILING_DEPTH),
            trade_sizes: ResettableWindow::new(),
            slippages: ResettableWindow::new(),
        })
    }

    /// Add a trade's quote volume and fees; close the day once the target is met
    ///
    /// `quote_side_figure` is the quote side's reserve + expected-from-exit
    /// right after the trade, used to size the next day's target.
    pub fn record_trade(
        &mut self,
        quote_volume: Amount,
        fees: Amount,
        quote_side_figure: Amount,
    ) -> SimulationResult<Option<DayRollover>> {
        self.cycle.accumulated_quote_volume += quote_volume.max(Decimal::ZERO);
        self.cycle.accumulated_fees += fees.max(Decimal::ZERO);

        if !self.cycle.target_reached() {
            return Ok(None);
        }

        // Draw the next day before touching state so a failure leaves today intact
        let next_pivot = self
            .model
            .next_pivot(&self.oracle, &mut self.rng, self.cycle.pivot_tick)?;
        let next_corridor = self.model.corridor(&self.oracle, next_pivot)?;
        let next_target = self.config.target_for(quote_side_figure);

        let completed_day = self.cycle.day;
        let volume = self.cycle.accumulated_quote_volume;
        let fees = self.cycle.accumulated_fees;

        self.volume_history.push(volume);
        self.fee_history.push(fees);
        self.trade_sizes.clear();
        self.slippages.clear();

        self.cycle = DayCycle {
            day: completed_day + 1,
            accumulated_quote_volume: Decimal::ZERO,
            target_quote_volume: next_target,
            pivot_tick: next_pivot,
            accumulated_fees: Decimal::ZERO,
        };
        self.corridor = next_corridor;

        info!(
            "Day {} closed: volume {}, fees {} | day {} target {}, pivot {}, corridor {}",
            completed_day,
            volume.round_dp(2),
            fees.round_dp(2),
            completed_day + 1,
            next_target.round_dp(2),
            next_pivot,
            next_corridor
        );

        Ok(Some(DayRollover {
            completed_day,
            volume,
            fees,
            next_target,
            next_pivot,
            next_corridor,
        }))
    }

    pub fn record_sample(&mut self, kind: IntradayKind, value: Amount) {
        match kind {
            IntradayKind::TradeSize => self.trade_sizes.push(value),
            IntradayKind::Slippage => self.slippages.push(value),
        }
    }

    /// Mean of the stored days plus today when today is nonzero
    pub fn trailing_average(&self, kind: TrailingKind) -> Amount {
        let (window, today) = match kind {
            TrailingKind::Volume => (&self.volume_history, self.cycle.accumulated_quote_volume),
            TrailingKind::Fees => (&self.fee_history, self.cycle.accumulated_fees),
        };

        let mut sum = window.sum();
        let mut count = window.len() as u64;
        if !today.is_zero() {
            sum += today;
            count += 1;
        }

        if count == 0 {
            Decimal::ZERO
        } else {
            sum / Decimal::from(count)
        }
    }

    pub fn intraday_average(&self, kind: IntradayKind) -> Amount {
        self.intraday_window(kind).mean()
    }

    pub fn trailing_window(&self, kind: TrailingKind) -> &BoundedWindow {
        match kind {
            TrailingKind::Volume => &self.volume_history,
            TrailingKind::Fees => &self.fee_history,
        }
    }

    pub fn intraday_window(&self, kind: IntradayKind) -> &ResettableWindow {
        match kind {
            IntradayKind::TradeSize => &self.trade_sizes,
            IntradayKind::Slippage => &self.slippages,
        }
    }

    pub fn day(&self) -> u32 {
        self.cycle.day
    }

    pub fn cycle(&self) -> &DayCycle {
        &self.cycle
    }

    /// Today's corridor
    pub fn corridor(&self) -> PriceCorridor {
        self.corridor
    }

    pub fn pivot(&self) -> Tick {
        self.cycle.pivot_tick
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corridor::PivotConfig;
    use flowsim_pool::GeometricOracle;
    use rand::SeedableRng;

    fn aggregator(initial_target: Amount) -> DayCycleAggregator<GeometricOracle> {
        let config = DayCycleConfig {
            initial_target: Some(initial_target),
            ..Default::default()
        };
        DayCycleAggregator::new(
            GeometricOracle::new(),
            CorridorModel::new(dec!(0.05), 114_445, PivotConfig::default()),
            config,
            114_445,
            dec!(1_000_000),
            StdRng::seed_from_u64(42),
        )
        .unwrap()
    }

    #[test]
    fn test_opening_state() {
        let agg = aggregator(dec!(500));
        assert_eq!(agg.day(), 1);
        assert_eq!(agg.cycle().target_quote_volume, dec!(500));
        assert_eq!(agg.pivot(), 114_445);
        assert!(agg.corridor().contains(114_445));
    }

    #[test]
    fn test_target_derived_from_figure_by_default() {
        let agg = DayCycleAggregator::new(
            GeometricOracle::new(),
            CorridorModel::new(dec!(0.05), 0, PivotConfig::default()),
            DayCycleConfig::default(),
            0,
            dec!(1_000_000),
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(agg.cycle().target_quote_volume, dec!(2_500_000));
    }

    #[test]
    fn test_sub_tick_volatility_rejected_at_open() {
        let result = DayCycleAggregator::new(
            GeometricOracle::new(),
            CorridorModel::new(dec!(0.000001), 0, PivotConfig::default()),
            DayCycleConfig::default(),
            0,
            dec!(1_000_000),
            StdRng::seed_from_u64(1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_accumulates_below_target() {
        let mut agg = aggregator(dec!(1_000));
        assert_eq!(agg.record_trade(dec!(400), dec!(1.2), dec!(1)).unwrap(), None);
        assert_eq!(agg.record_trade(dec!(599.99), dec!(1.8), dec!(1)).unwrap(), None);

        assert_eq!(agg.day(), 1);
        assert_eq!(agg.cycle().accumulated_quote_volume, dec!(999.99));
        assert_eq!(agg.cycle().accumulated_fees, dec!(3.0));
        assert!(agg.cycle().progress() < Decimal::ONE);
    }

    #[test]
    fn test_exact_target_rolls_over_once() {
        let mut agg = aggregator(dec!(1_000));
        agg.record_sample(IntradayKind::TradeSize, dec!(1_000));
        agg.record_sample(IntradayKind::Slippage, dec!(0.001));

        let rollover = agg
            .record_trade(dec!(1_000), dec!(3), dec!(400_000))
            .unwrap()
            .expect("volume equal to target closes the day");

        assert_eq!(rollover.completed_day, 1);
        assert_eq!(rollover.volume, dec!(1_000));
        assert_eq!(rollover.fees, dec!(3));
        assert_eq!(rollover.next_target, dec!(1_000_000));

        assert_eq!(agg.day(), 2);
        assert!(agg.cycle().accumulated_quote_volume.is_zero());
        assert!(agg.cycle().accumulated_fees.is_zero());
        assert_eq!(agg.cycle().target_quote_volume, dec!(1_000_000));
        assert_eq!(agg.pivot(), rollover.next_pivot);
        assert_eq!(agg.corridor(), rollover.next_corridor);

        assert!(agg.intraday_window(IntradayKind::TradeSize).is_empty());
        assert!(agg.intraday_window(IntradayKind::Slippage).is_empty());
        assert_eq!(agg.intraday_average(IntradayKind::TradeSize), Decimal::ZERO);

        // Next trade lands on day 2 without another rollover
        assert_eq!(agg.record_trade(dec!(10), dec!(0.03), dec!(400_000)).unwrap(), None);
        assert_eq!(agg.day(), 2);
    }

    #[test]
    fn test_new_pivot_is_an_edge_of_old_corridor() {
        let mut agg = aggregator(dec!(1));
        let before = agg.corridor();
        let rollover = agg.record_trade(dec!(1), dec!(0), dec!(1)).unwrap().unwrap();
        assert!(rollover.next_pivot == before.left_tick || rollover.next_pivot == before.right_tick);
        assert!(rollover.next_corridor.contains(rollover.next_pivot));
    }

    #[test]
    fn test_trailing_average_empty_is_zero() {
        let agg = aggregator(dec!(1_000));
        assert_eq!(agg.trailing_average(TrailingKind::Volume), Decimal::ZERO);
        assert_eq!(agg.trailing_average(TrailingKind::Fees), Decimal::ZERO);
    }

    #[test]
    fn test_trailing_average_includes_nonzero_today() {
        let mut agg = aggregator(dec!(100));
        agg.record_trade(dec!(100), dec!(1), dec!(120)).unwrap(); // day 1: 100, target now 300
        agg.record_trade(dec!(300), dec!(2), dec!(80)).unwrap(); // day 2: 300, target now 200

        // Today empty: only stored days count
        assert_eq!(agg.trailing_average(TrailingKind::Volume), dec!(200));
        assert_eq!(agg.trailing_average(TrailingKind::Fees), dec!(1.5));

        // Today partially elapsed counts as a full entry
        agg.record_trade(dec!(50), dec!(0.6), dec!(80)).unwrap();
        assert_eq!(agg.trailing_average(TrailingKind::Volume), dec!(150));
        assert_eq!(agg.trailing_average(TrailingKind::Fees), dec!(1.2));
    }

    #[test]
    fn test_intraday_average() {
        let mut agg = aggregator(dec!(1_000_000));
        agg.record_sample(IntradayKind::TradeSize, dec!(100));
        agg.record_sample(IntradayKind::TradeSize, dec!(300));
        agg.record_sample(IntradayKind::Slippage, dec!(0.002));

        assert_eq!(agg.intraday_average(IntradayKind::TradeSize), dec!(200));
        assert_eq!(agg.intraday_average(IntradayKind::Slippage), dec!(0.002));
    }

    #[test]
    fn test_thirty_rollovers_keep_latest_in_order() {
        let mut agg = aggregator(dec!(1));
        for day in 1..=30u64 {
            let volume = Decimal::from(day);
            let rollover = agg
                .record_trade(volume, volume / dec!(100), dec!(0))
                .unwrap();
            assert!(rollover.is_some(), "day {} did not close", day);
        }

        assert_eq!(agg.day(), 31);
        let volumes: Vec<Amount> = agg.trailing_window(TrailingKind::Volume).values().copied().collect();
        let expected: Vec<Amount> = (2..=30u64).map(Decimal::from).collect();
        assert_eq!(volumes.len(), TRAILING_DEPTH);
        assert_eq!(volumes, expected);

        let fees: Vec<Amount> = agg.trailing_window(TrailingKind::Fees).values().copied().collect();
        assert_eq!(fees.first(), Some(&dec!(0.02)));
        assert_eq!(fees.last(), Some(&dec!(0.30)));
    }
}
