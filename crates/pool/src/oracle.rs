//! Geometric tick grid: each tick is a 0.01% price step

use flowsim_core::{Amount, AssetSide, Tick};
use flowsim_ports::TickOracle;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

/// Price ratio between neighbouring ticks
pub const TICK_BASE: Decimal = dec!(1.0001);

/// Ticks are clamped so 1.0001^tick stays representable
pub const MIN_TICK: Tick = -600_000;
pub const MAX_TICK: Tick = 600_000;

/// `price(tick, Base) = 1.0001^tick` quote per base
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricOracle;

impl GeometricOracle {
    pub fn new() -> Self {
        Self
    }
}

impl TickOracle for GeometricOracle {
    fn price(&self, tick: Tick, side: AssetSide) -> Amount {
        let tick = tick.clamp(MIN_TICK, MAX_TICK);
        let base_price = TICK_BASE.powi(tick as i64);
        match side {
            AssetSide::Base => base_price,
            AssetSide::Quote => Decimal::ONE / base_price,
        }
    }

    fn tick_for_price(&self, price: Amount) -> Tick {
        if price <= Decimal::ZERO {
            return MIN_TICK;
        }
        let (Some(ln_price), Some(ln_base)) = (price.checked_ln(), TICK_BASE.checked_ln()) else {
            return MIN_TICK;
        };
        (ln_price / ln_base)
            .floor()
            .to_i32()
            .unwrap_or(MAX_TICK)
            .clamp(MIN_TICK, MAX_TICK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_zero_is_parity() {
        let oracle = GeometricOracle::new();
        assert_eq!(oracle.price(0, AssetSide::Base), Decimal::ONE);
        assert_eq!(oracle.price(0, AssetSide::Quote), Decimal::ONE);
    }

    #[test]
    fn test_price_increases_with_tick() {
        let oracle = GeometricOracle::new();
        let low = oracle.price(100, AssetSide::Base);
        let high = oracle.price(101, AssetSide::Base);
        assert!(high > low);
        assert!(oracle.price(101, AssetSide::Quote) < oracle.price(100, AssetSide::Quote));
    }

    #[test]
    fn test_tick_for_price_inverts_price() {
        let oracle = GeometricOracle::new();
        for tick in [-50_000, -1, 1, 487, 76_012, 114_445] {
            let price = oracle.price(tick, AssetSide::Base);
            // Approximate inverse: may land one tick below on rounding
            let back = oracle.tick_for_price(price * dec!(1.00001));
            assert_eq!(back, tick, "tick {} came back as {}", tick, back);
        }
    }

    #[test]
    fn test_tick_for_price_non_positive() {
        let oracle = GeometricOracle::new();
        assert_eq!(oracle.tick_for_price(Decimal::ZERO), MIN_TICK);
        assert_eq!(oracle.tick_for_price(dec!(-3)), MIN_TICK);
    }
}
