//! Deterministic pool double for engine tests

use flowsim_core::{Amount, AssetSide, Direction, PerSide, SideStats, SwapOutcome, Tick, TradeIntent};
use flowsim_pool::GeometricOracle;
use flowsim_ports::{LiquidityPool, TickOracle};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use std::cell::Cell;

/// Pool whose impact is `ceil(quantity * ticks_per_unit[input side])`
pub struct MockPool {
    tick: Tick,
    ticks_per_unit: PerSide<Amount>,
    reserves: PerSide<Amount>,
    deposited: PerSide<Amount>,
    fee_factor: Amount,
    estimates: Cell<u32>,
}

impl MockPool {
    pub fn new(tick: Tick) -> Self {
        let deposited = PerSide::new(dec!(10), dec!(1_000_000));
        Self {
            tick,
            ticks_per_unit: PerSide::new(dec!(200), dec!(0.002)),
            reserves: deposited,
            deposited,
            fee_factor: dec!(0.003),
            estimates: Cell::new(0),
        }
    }

    pub fn with_ticks_per_unit(mut self, base: Amount, quote: Amount) -> Self {
        self.ticks_per_unit = PerSide::new(base, quote);
        self
    }

    pub fn estimate_calls(&self) -> u32 {
        self.estimates.get()
    }

    fn impact(&self, intent: &TradeIntent) -> u32 {
        let per_unit = *self.ticks_per_unit.get(intent.direction.input_side());
        (intent.quantity_in * per_unit).ceil().to_u32().unwrap_or(u32::MAX)
    }

    fn price(&self) -> Amount {
        GeometricOracle::new().price(self.tick, AssetSide::Base)
    }
}

impl LiquidityPool for MockPool {
    fn cur_tick(&self) -> Tick {
        self.tick
    }

    fn estimate_impact_ticks(&self, intent: &TradeIntent) -> u32 {
        self.estimates.set(self.estimates.get() + 1);
        self.impact(intent)
    }

    fn swap(&mut self, intent: &TradeIntent) -> SwapOutcome {
        let impact = self.impact(intent) as i32;
        self.tick += match intent.direction {
            Direction::QuoteToBase => impact,
            Direction::BaseToQuote => -impact,
        };
        let fees_in = intent.quantity_in * self.fee_factor;
        *self.reserves.get_mut(intent.direction.input_side()) += fees_in;

        SwapOutcome {
            amount_in: intent.quantity_in,
            fee_factor: self.fee_factor,
            fees_in,
            slippage: Decimal::from(impact) * dec!(0.00005),
        }
    }

    fn reserves(&self) -> PerSide<Amount> {
        self.reserves
    }

    fn deposited_reserves(&self) -> PerSide<Amount> {
        self.deposited
    }

    fn tvl_quote(&self) -> Amount {
        self.reserves.base * self.price() + self.reserves.quote
    }

    fn impermanent_loss(&self) -> PerSide<Amount> {
        PerSide::default()
    }

    fn stats_by_side(&self) -> PerSide<SideStats> {
        PerSide::new(AssetSide::Base, AssetSide::Quote).map(|_, side| SideStats {
            actual_reserve: *self.reserves.get(side),
            expected_reserve_from_exit: Decimal::ZERO,
            deposited_reserve: *self.deposited.get(side),
            respective_reserve: Decimal::ZERO,
        })
    }
}
