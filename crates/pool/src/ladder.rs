//! Two-sided range-order ladder pool
//!
//! Each tick level holds base and quote, split by owner (the base-side
//! deposit and the quote-side deposit). A swap walks the ladder away from the
//! current tick, filling every owner at the level's price. Owners are paid the
//! gross input (fee included), so neither side's reserve plus
//! expected-from-exit can shrink.

use std::collections::BTreeMap;

use flowsim_core::{
    Amount, AssetSide, Direction, PerSide, SideStats, SwapOutcome, Tick, TradeIntent,
};
use flowsim_ports::{LiquidityPool, TickOracle};
use log::trace;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};
use crate::oracle::{MAX_TICK, MIN_TICK};

/// Reported stats are rounded to this many places
const STATS_SCALE: u32 = 18;

/// Leftover input below this is not worth a fill
const DUST: Decimal = dec!(0.000000000001);

/// Ladder construction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderConfig {
    /// Tick the pool opens at
    pub initial_tick: Tick,
    /// Capital deposited per side, in that side's asset
    pub deposit: PerSide<Amount>,
    /// Levels funded on each side of the initial tick
    pub half_width_ticks: u32,
    /// Swap fee as a fraction (0.003 = 0.3%)
    pub fee_factor: Amount,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            initial_tick: 114_445,
            deposit: PerSide::new(dec!(10), dec!(1_000_000)),
            half_width_ticks: 2_000,
            fee_factor: dec!(0.003),
        }
    }
}

/// What one owner holds at one level
#[derive(Debug, Clone, Copy, Default)]
struct Holding {
    base: Amount,
    quote: Amount,
}

impl Holding {
    fn amount(&self, side: AssetSide) -> Amount {
        match side {
            AssetSide::Base => self.base,
            AssetSide::Quote => self.quote,
        }
    }

    fn amount_mut(&mut self, side: AssetSide) -> &mut Amount {
        match side {
            AssetSide::Base => &mut self.base,
            AssetSide::Quote => &mut self.quote,
        }
    }
}

#[derive(Debug, Clone)]
struct Level {
    /// Quote per base at this tick
    price: Amount,
    /// Indexed by owner: the base-side deposit and the quote-side deposit
    owners: PerSide<Holding>,
}

impl Level {
    fn available(&self, side: AssetSide) -> Amount {
        self.owners.base.amount(side) + self.owners.quote.amount(side)
    }
}

/// One level touched by a planned swap
#[derive(Debug, Clone, Copy)]
struct Fill {
    tick: Tick,
    /// Output asset taken from the level
    taken: Amount,
    /// Net input (after fee) paid into the level
    paid: Amount,
    /// The level's whole output inventory was taken
    exhausted: bool,
}

/// Result of walking the ladder without mutating it
#[derive(Debug, Clone)]
struct SwapPlan {
    fills: Vec<Fill>,
    end_tick: Tick,
    /// Net input actually consumed
    net_used: Amount,
    /// Output delivered to the trader
    output: Amount,
}

/// Reference AMM pool: a two-sided range-order ladder
#[derive(Debug, Clone)]
pub struct LadderPool<O> {
    oracle: O,
    levels: BTreeMap<Tick, Level>,
    cur_tick: Tick,
    fee_factor: Amount,
    deposit: PerSide<Amount>,
}

impl<O: TickOracle> LadderPool<O> {
    /// Fund both sides evenly across `half_width_ticks` levels
    pub fn new(oracle: O, config: LadderConfig) -> Result<Self> {
        if config.deposit.base <= Decimal::ZERO || config.deposit.quote <= Decimal::ZERO {
            return Err(PoolError::InvalidAmount(format!(
                "deposits must be positive (base {}, quote {})",
                config.deposit.base, config.deposit.quote
            )));
        }
        if config.half_width_ticks == 0 {
            return Err(PoolError::InvalidLadder(
                "half_width_ticks must be at least 1".to_string(),
            ));
        }
        if config.fee_factor < Decimal::ZERO || config.fee_factor >= Decimal::ONE {
            return Err(PoolError::InvalidAmount(format!(
                "fee factor {} must be in [0, 1)",
                config.fee_factor
            )));
        }

        let reach = config.half_width_ticks as i64;
        if (config.initial_tick as i64) - reach < MIN_TICK as i64
            || (config.initial_tick as i64) + reach > MAX_TICK as i64
        {
            return Err(PoolError::InvalidLadder(format!(
                "{} levels around tick {} leave [{}, {}]",
                config.half_width_ticks, config.initial_tick, MIN_TICK, MAX_TICK
            )));
        }

        let n = config.half_width_ticks as i32;
        let per_level = PerSide::new(
            config.deposit.base / Decimal::from(n),
            config.deposit.quote / Decimal::from(n),
        );

        let mut levels = BTreeMap::new();
        for offset in 1..=n {
            let above = config.initial_tick + offset;
            let mut level = Level {
                price: oracle.price(above, AssetSide::Base),
                owners: PerSide::default(),
            };
            level.owners.base.base = per_level.base;
            levels.insert(above, level);

            let below = config.initial_tick - offset;
            let mut level = Level {
                price: oracle.price(below, AssetSide::Base),
                owners: PerSide::default(),
            };
            level.owners.quote.quote = per_level.quote;
            levels.insert(below, level);
        }

        Ok(Self {
            oracle,
            levels,
            cur_tick: config.initial_tick,
            fee_factor: config.fee_factor,
            deposit: config.deposit,
        })
    }

    pub fn fee_factor(&self) -> Amount {
        self.fee_factor
    }

    /// Current price of base in quote
    pub fn current_price(&self) -> Amount {
        self.oracle.price(self.cur_tick, AssetSide::Base)
    }

    /// Levels in the order a swap in `direction` consumes them
    fn walk(&self, direction: Direction) -> Box<dyn Iterator<Item = (&Tick, &Level)> + '_> {
        match direction {
            Direction::QuoteToBase => Box::new(self.levels.range(self.cur_tick..)),
            Direction::BaseToQuote => Box::new(self.levels.range(..=self.cur_tick).rev()),
        }
    }

    /// Walk the ladder for `intent` without touching any level
    fn plan(&self, intent: &TradeIntent) -> SwapPlan {
        let mut plan = SwapPlan {
            fills: Vec::new(),
            end_tick: self.cur_tick,
            net_used: Decimal::ZERO,
            output: Decimal::ZERO,
        };
        if intent.quantity_in <= Decimal::ZERO {
            return plan;
        }

        let net_in = intent.quantity_in * (Decimal::ONE - self.fee_factor);
        let output_side = intent.direction.output_side();
        let mut remaining = net_in;

        for (&tick, level) in self.walk(intent.direction) {
            let available = level.available(output_side);
            if available <= Decimal::ZERO {
                continue;
            }
            plan.end_tick = tick;

            // Input needed to take everything at this level
            let cost = match intent.direction {
                Direction::QuoteToBase => available * level.price,
                Direction::BaseToQuote => available / level.price,
            };

            if remaining >= cost {
                plan.fills.push(Fill {
                    tick,
                    taken: available,
                    paid: cost,
                    exhausted: true,
                });
                plan.output += available;
                remaining -= cost;
                if remaining.is_zero() {
                    break;
                }
            } else {
                if remaining < DUST {
                    break;
                }
                let taken = match intent.direction {
                    Direction::QuoteToBase => remaining / level.price,
                    Direction::BaseToQuote => remaining * level.price,
                };
                plan.fills.push(Fill {
                    tick,
                    taken,
                    paid: remaining,
                    exhausted: false,
                });
                plan.output += taken;
                remaining = Decimal::ZERO;
                break;
            }
        }

        plan.net_used = net_in - remaining;
        plan
    }

    /// Unrounded accounting for one side
    fn raw_side_stats(&self, side: AssetSide) -> SideStats {
        let counter = side.opposite();
        let mut actual = Decimal::ZERO;
        let mut respective = Decimal::ZERO;
        let mut expected = Decimal::ZERO;

        for level in self.levels.values() {
            let holding = level.owners.get(side);
            actual += holding.amount(side);
            let inventory = holding.amount(counter);
            if inventory.is_zero() {
                continue;
            }
            respective += inventory;
            expected += match side {
                AssetSide::Base => inventory / level.price,
                AssetSide::Quote => inventory * level.price,
            };
        }

        SideStats {
            actual_reserve: actual,
            expected_reserve_from_exit: expected,
            deposited_reserve: *self.deposit.get(side),
            respective_reserve: respective,
        }
    }

    fn side_stats(&self, side: AssetSide) -> SideStats {
        let raw = self.raw_side_stats(side);
        SideStats {
            actual_reserve: raw.actual_reserve.round_dp(STATS_SCALE),
            expected_reserve_from_exit: raw.expected_reserve_from_exit.round_dp(STATS_SCALE),
            deposited_reserve: raw.deposited_reserve,
            respective_reserve: raw.respective_reserve.round_dp(STATS_SCALE),
        }
    }

    /// Current value of one side's holdings, in quote
    fn side_value_quote(&self, side: AssetSide, stats: &SideStats, price: Amount) -> Amount {
        match side {
            AssetSide::Base => stats.actual_reserve * price + stats.respective_reserve,
            AssetSide::Quote => stats.actual_reserve + stats.respective_reserve * price,
        }
    }
}

impl<O: TickOracle> LiquidityPool for LadderPool<O> {
    fn cur_tick(&self) -> Tick {
        self.cur_tick
    }

    fn estimate_impact_ticks(&self, intent: &TradeIntent) -> u32 {
        let plan = self.plan(intent);
        (plan.end_tick as i64 - self.cur_tick as i64).unsigned_abs() as u32
    }

    fn swap(&mut self, intent: &TradeIntent) -> SwapOutcome {
        let start_price = self.current_price();
        let plan = self.plan(intent);
        let input_side = intent.direction.input_side();
        let output_side = intent.direction.output_side();

        // Owners receive the fee on top of the net input they absorbed
        let gross_up = if self.fee_factor.is_zero() {
            Decimal::ONE
        } else {
            Decimal::ONE / (Decimal::ONE - self.fee_factor)
        };

        for fill in &plan.fills {
            let Some(level) = self.levels.get_mut(&fill.tick) else {
                continue;
            };
            let available = level.available(output_side);
            if available <= Decimal::ZERO {
                continue;
            }
            for owner in [AssetSide::Base, AssetSide::Quote] {
                let holding = level.owners.get_mut(owner);
                let held = holding.amount(output_side);
                if held.is_zero() {
                    continue;
                }
                let share = held / available;
                let out = holding.amount_mut(output_side);
                *out = if fill.exhausted {
                    Decimal::ZERO
                } else {
                    (held - fill.taken * share).max(Decimal::ZERO)
                };
                *holding.amount_mut(input_side) += fill.paid * share * gross_up;
            }
            trace!(
                "ladder fill @{}: took {} {}, paid {} {}",
                fill.tick, fill.taken, output_side, fill.paid, input_side
            );
        }

        self.cur_tick = plan.end_tick;

        let charged = plan.net_used * gross_up;
        let fees_in = charged - plan.net_used;

        let slippage = if plan.output.is_zero() || plan.net_used.is_zero() {
            Decimal::ZERO
        } else {
            let executed = match intent.direction {
                Direction::QuoteToBase => plan.net_used / plan.output,
                Direction::BaseToQuote => plan.output / plan.net_used,
            };
            ((executed - start_price) / start_price).abs()
        };

        SwapOutcome {
            amount_in: charged,
            fee_factor: self.fee_factor,
            fees_in,
            slippage,
        }
    }

    fn reserves(&self) -> PerSide<Amount> {
        // Round the sum, not the parts, so a tiny gain never reads as a loss
        PerSide::new(AssetSide::Base, AssetSide::Quote)
            .map(|_, side| self.raw_side_stats(side).total_reserve().round_dp(STATS_SCALE))
    }

    fn deposited_reserves(&self) -> PerSide<Amount> {
        self.deposit
    }

    fn tvl_quote(&self) -> Amount {
        let price = self.current_price();
        let stats = self.stats_by_side();
        self.side_value_quote(AssetSide::Base, &stats.base, price)
            + self.side_value_quote(AssetSide::Quote, &stats.quote, price)
    }

    fn impermanent_loss(&self) -> PerSide<Amount> {
        let price = self.current_price();
        self.stats_by_side().map(|side, stats| {
            let hold = match side {
                AssetSide::Base => stats.deposited_reserve * price,
                AssetSide::Quote => stats.deposited_reserve,
            };
            if hold.is_zero() {
                return Decimal::ZERO;
            }
            let current = self.side_value_quote(side, &stats, price);
            (hold - current) / hold
        })
    }

    fn stats_by_side(&self) -> PerSide<SideStats> {
        PerSide::new(
            self.side_stats(AssetSide::Base),
            self.side_stats(AssetSide::Quote),
        )
    }
}
