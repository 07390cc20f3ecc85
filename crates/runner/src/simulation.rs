//! Simulation - one pool, one generator, one day cycle
//!
//! `step` applies a whole trade synchronously:
//! intent → swap → reserve check → intraday samples → day cycle.
//! Nothing here awaits, so a reader between two steps always sees pool and
//! aggregator in agreement.

use crate::config::SimulationConfig;
use crate::error::Result;
use chrono::Utc;
use flowsim_core::{Amount, AssetSide, Direction, PerSide, Timestamp, TradeIntent};
use flowsim_engine::{
    CorridorModel, DayCycleAggregator, DayRollover, IntradayKind, MetricsSnapshot, TradeGenerator,
};
use flowsim_pool::{GeometricOracle, LadderPool};
use flowsim_ports::{LiquidityPool, SimulationError, SimulationResult, TickOracle};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;

/// Everything one trade did
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReport {
    pub intent: TradeIntent,
    /// Filled input converted to quote at the pre-trade price
    pub quote_volume: Amount,
    pub quote_fees: Amount,
    pub slippage: Amount,
    pub estimated_impact: u32,
    pub usable_width: u32,
    pub rollover: Option<DayRollover>,
}

/// Simulation over the reference ladder pool
pub type LadderSimulation = Simulation<LadderPool<GeometricOracle>, GeometricOracle>;

pub struct Simulation<P, O> {
    pool: P,
    generator: TradeGenerator,
    aggregator: DayCycleAggregator<O>,
    fee_factor: Amount,
    trades: u64,
}

fn seeded_rngs(seed: Option<u64>) -> (StdRng, StdRng) {
    match seed {
        Some(seed) => (
            StdRng::seed_from_u64(seed),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        ),
        None => (StdRng::from_entropy(), StdRng::from_entropy()),
    }
}

/// Fail when either side's total reserve went down
fn check_reserves(before: PerSide<Amount>, after: PerSide<Amount>) -> SimulationResult<()> {
    for side in [AssetSide::Base, AssetSide::Quote] {
        let (before, after) = (*before.get(side), *after.get(side));
        if after < before {
            return Err(SimulationError::InvariantViolation {
                side,
                before,
                after,
            });
        }
    }
    Ok(())
}

impl LadderSimulation {
    /// Build the reference pool from `config.market` and wrap it
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let pool = LadderPool::new(GeometricOracle::new(), config.market.ladder_config())?;
        Ok(Self::new(pool, GeometricOracle::new(), config)?)
    }
}

impl<P: LiquidityPool, O: TickOracle> Simulation<P, O> {
    /// Open day 1 at the pool's current tick
    ///
    /// Fails with `ConfigInconsistency` when the volatility is narrower than
    /// one tick at that price.
    pub fn new(pool: P, oracle: O, config: &SimulationConfig) -> SimulationResult<Self> {
        let (generator_rng, pivot_rng) = seeded_rngs(config.seed);
        let opening_tick = pool.cur_tick();
        let model = CorridorModel::from_config(&config.corridor, opening_tick);

        let aggregator = DayCycleAggregator::new(
            oracle,
            model,
            config.day_cycle.clone(),
            opening_tick,
            pool.reserves().quote,
            pivot_rng,
        )?;

        info!(
            "Simulation ready: {}/{} at tick {}, volatility {}, seed {:?}",
            config.market.base_symbol,
            config.market.quote_symbol,
            opening_tick,
            config.corridor.volatility,
            config.seed
        );

        Ok(Self {
            pool,
            generator: TradeGenerator::new(config.generator.clone(), generator_rng),
            aggregator,
            fee_factor: config.market.fee_factor,
            trades: 0,
        })
    }

    /// Generate and apply one trade
    pub fn step(&mut self) -> SimulationResult<TradeReport> {
        let decision = self.generator.generate(&self.pool, self.aggregator.corridor());
        let intent = decision.intent;
        let price = self
            .aggregator
            .oracle()
            .price(self.pool.cur_tick(), AssetSide::Base);

        let before = self.pool.reserves();
        let outcome = self.pool.swap(&intent);
        let after = self.pool.reserves();
        check_reserves(before, after)?;

        self.trades += 1;
        self.fee_factor = outcome.fee_factor;

        // Book what the pool filled, not what was asked for
        let (quote_volume, quote_fees) = match intent.direction {
            Direction::QuoteToBase => (outcome.amount_in, outcome.fees_in),
            Direction::BaseToQuote => (outcome.amount_in * price, outcome.fees_in * price),
        };

        if outcome.amount_in > Decimal::ZERO {
            self.aggregator
                .record_sample(IntradayKind::TradeSize, quote_volume);
            self.aggregator
                .record_sample(IntradayKind::Slippage, outcome.slippage);
        }
        // A closing trade's samples leave with its day
        let rollover = self
            .aggregator
            .record_trade(quote_volume, quote_fees, after.quote)?;

        debug!(
            "Trade #{}: {} {} (impact {}/{} ticks, fees {}, slippage {}) -> tick {}",
            self.trades,
            intent.direction,
            intent.quantity_in,
            decision.estimated_impact,
            decision.usable_width,
            outcome.fees_in,
            outcome.slippage,
            self.pool.cur_tick()
        );

        Ok(TradeReport {
            intent,
            quote_volume,
            quote_fees,
            slippage: outcome.slippage,
            estimated_impact: decision.estimated_impact,
            usable_width: decision.usable_width,
            rollover,
        })
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, sampled_at: Timestamp) -> MetricsSnapshot {
        MetricsSnapshot::assemble(
            &self.pool,
            &self.aggregator,
            self.fee_factor,
            self.trades,
            sampled_at,
        )
    }

    pub fn trades(&self) -> u64 {
        self.trades
    }

    pub fn day(&self) -> u32 {
        self.aggregator.day()
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn aggregator(&self) -> &DayCycleAggregator<O> {
        &self.aggregator
    }
}
