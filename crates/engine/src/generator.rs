//! Trade Generator
//!
//! Emits one trade intent per call. The direction keeps the pool inside
//! today's corridor, and the size backs off geometrically until its
//! estimated impact fits the room left on that side.

use flowsim_core::{Amount, AssetSide, Direction, PriceCorridor, Tick, TradeIntent, random_unit};
use flowsim_ports::LiquidityPool;
use log::trace;
use rand::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Default notional and the smallest notional the search may fall back to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub default: Amount,
    pub floor: Amount,
}

impl SizeLimits {
    pub fn new(default: Amount, floor: Amount) -> Self {
        Self { default, floor }
    }

    /// Upper bound on impact estimates per search: ⌈log2(default / floor)⌉ + 1
    pub fn max_iterations(&self) -> u32 {
        let mut quantity = self.default;
        let mut count = 1;
        while self.floor > Decimal::ZERO && quantity > self.floor {
            quantity /= dec!(2);
            count += 1;
        }
        count
    }

    pub fn is_valid(&self) -> bool {
        self.floor > Decimal::ZERO && self.default >= self.floor
    }
}

/// Size limits per input asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub base: SizeLimits,
    pub quote: SizeLimits,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base: SizeLimits::new(dec!(0.1), dec!(0.0001)),
            quote: SizeLimits::new(dec!(10_000), dec!(10)),
        }
    }
}

impl GeneratorConfig {
    pub fn limits(&self, side: AssetSide) -> SizeLimits {
        match side {
            AssetSide::Base => self.base,
            AssetSide::Quote => self.quote,
        }
    }
}

/// One generated trade with the search details that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct TradeDecision {
    pub intent: TradeIntent,
    /// Ticks the trade may move the price before leaving the corridor
    pub usable_width: u32,
    /// Impact estimate for the accepted quantity
    pub estimated_impact: u32,
    /// Impact estimates made by the search
    pub iterations: u32,
}

impl TradeDecision {
    /// Floor-sized trade that still overshoots the usable width
    pub fn overshoots(&self) -> bool {
        self.estimated_impact > self.usable_width
    }
}

fn span(from: Tick, to: Tick) -> u32 {
    (to as i64 - from as i64 + 1).max(0) as u32
}

/// Pick a direction from the current tick's position in the corridor
///
/// `r` is a uniform draw in [0, 1); it only matters when `cur` is inside.
pub fn choose_direction(cur: Tick, corridor: PriceCorridor, r: Amount) -> (Direction, u32) {
    let PriceCorridor {
        left_tick: left,
        right_tick: right,
    } = corridor;

    if cur < left {
        // Clamp the left edge to cur
        return (Direction::QuoteToBase, span(cur, right));
    }
    if cur > right {
        return (Direction::BaseToQuote, span(left, cur));
    }

    let width = Decimal::from(span(left, right));
    let quote_width = cur as i64 - left as i64;

    if r * width <= Decimal::from(quote_width) {
        (Direction::BaseToQuote, quote_width as u32)
    } else {
        (Direction::QuoteToBase, span(cur, right))
    }
}

/// Halve from the default notional until the impact fits `usable_width`,
/// settling on the floor when nothing does
///
/// Returns the accepted intent, its impact estimate and the estimate count.
pub fn search_size<P: LiquidityPool + ?Sized>(
    pool: &P,
    direction: Direction,
    limits: SizeLimits,
    usable_width: u32,
) -> (TradeIntent, u32, u32) {
    let mut quantity = limits.default.max(limits.floor);
    let mut iterations = 0;

    loop {
        let intent = TradeIntent::new(direction, quantity);
        let impact = pool.estimate_impact_ticks(&intent);
        iterations += 1;

        if impact <= usable_width || quantity <= limits.floor {
            return (intent, impact, iterations);
        }

        trace!(
            "{} {} moves {} ticks, room {}: halving",
            direction, quantity, impact, usable_width
        );
        quantity = (quantity / dec!(2)).max(limits.floor);
    }
}

/// Stochastic trade source bound to a seeded RNG
pub struct TradeGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl TradeGenerator {
    pub fn new(config: GeneratorConfig, rng: StdRng) -> Self {
        Self { config, rng }
    }

    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Decide the next trade against `pool` inside `corridor`
    ///
    /// Only `estimate_impact_ticks` is called; the pool is never mutated.
    pub fn generate<P: LiquidityPool + ?Sized>(
        &mut self,
        pool: &P,
        corridor: PriceCorridor,
    ) -> TradeDecision {
        let r = random_unit(&mut self.rng);
        let (direction, usable_width) = choose_direction(pool.cur_tick(), corridor, r);
        let limits = self.config.limits(direction.input_side());
        let (intent, estimated_impact, iterations) =
            search_size(pool, direction, limits, usable_width);

        TradeDecision {
            intent,
            usable_width,
            estimated_impact,
            iterations,
        }
    }
}
