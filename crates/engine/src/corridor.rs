//! Corridor & Pivot Model
//!
//! Turns a fractional daily volatility into a tick band around the pivot,
//! and moves the pivot at each day rollover with a biased random walk:
//!
//! - reference tick inside the corridor: jump to either edge (coin flip)
//! - corridor entirely above the reference: jump left with `pull_probability`
//! - corridor entirely below the reference: jump right with `pull_probability`

use flowsim_core::{Amount, AssetSide, PriceCorridor, Tick, random_unit};
use flowsim_ports::{SimulationError, SimulationResult, TickOracle};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Probabilities of the pivot walk
///
/// The defaults (0.5 and 0.99) are tuning constants with no derivation
/// behind them; keep them unless the demo calls for different drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotConfig {
    /// P(left) when the reference tick lies inside the corridor
    pub escape_probability: Amount,
    /// P(nearer edge) when the corridor has drifted off the reference
    pub pull_probability: Amount,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            escape_probability: dec!(0.5),
            pull_probability: dec!(0.99),
        }
    }
}

/// Corridor section of the simulation config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    /// Fractional daily volatility (0.05 = 5%)
    pub volatility: Amount,
    /// Anchor the pivot reverts toward; `None` uses the pool's opening tick
    pub reference_tick: Option<Tick>,
    pub pivot: PivotConfig,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            volatility: dec!(0.05),
            reference_tick: None,
            pivot: PivotConfig::default(),
        }
    }
}

/// Derive `[pivot - width, pivot + width]` where `width` is the tick offset
/// of `price(pivot) * (1 + volatility)`
///
/// A width under one tick means the volatility cannot be expressed on the
/// pool's grid; that is a configuration error, not a runtime condition.
pub fn derive_corridor<O: TickOracle + ?Sized>(
    oracle: &O,
    pivot: Tick,
    volatility: Amount,
) -> SimulationResult<PriceCorridor> {
    let pivot_price = oracle.price(pivot, AssetSide::Base);
    let shifted = oracle.tick_for_price(pivot_price * (Decimal::ONE + volatility));
    let width = shifted as i64 - pivot as i64;

    if width < 1 {
        return Err(SimulationError::ConfigInconsistency {
            pivot,
            volatility,
            width,
        });
    }

    let width = width as i32;
    Ok(PriceCorridor::new(
        pivot.saturating_sub(width),
        pivot.saturating_add(width),
    ))
}

/// Draw the next pivot: one of the edges of today's corridor
pub fn next_pivot<O: TickOracle + ?Sized, R: Rng + ?Sized>(
    oracle: &O,
    rng: &mut R,
    current: Tick,
    volatility: Amount,
    reference_tick: Tick,
    config: &PivotConfig,
) -> SimulationResult<Tick> {
    let corridor = derive_corridor(oracle, current, volatility)?;
    let r = random_unit(rng);

    let pick_left = if corridor.contains(reference_tick) {
        r < config.escape_probability
    } else if corridor.is_above(reference_tick) {
        r < config.pull_probability
    } else {
        r >= config.pull_probability
    };

    Ok(if pick_left {
        corridor.left_tick
    } else {
        corridor.right_tick
    })
}

/// Volatility, anchor and walk parameters bundled for the aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct CorridorModel {
    volatility: Amount,
    reference_tick: Tick,
    pivot: PivotConfig,
}

impl CorridorModel {
    pub fn new(volatility: Amount, reference_tick: Tick, pivot: PivotConfig) -> Self {
        Self {
            volatility,
            reference_tick,
            pivot,
        }
    }

    /// Build from config, anchoring to `opening_tick` when no reference is set
    pub fn from_config(config: &CorridorConfig, opening_tick: Tick) -> Self {
        Self::new(
            config.volatility,
            config.reference_tick.unwrap_or(opening_tick),
            config.pivot,
        )
    }

    pub fn reference_tick(&self) -> Tick {
        self.reference_tick
    }

    pub fn corridor<O: TickOracle + ?Sized>(
        &self,
        oracle: &O,
        pivot: Tick,
    ) -> SimulationResult<PriceCorridor> {
        derive_corridor(oracle, pivot, self.volatility)
    }

    pub fn next_pivot<O: TickOracle + ?Sized, R: Rng + ?Sized>(
        &self,
        oracle: &O,
        rng: &mut R,
        current: Tick,
    ) -> SimulationResult<Tick> {
        next_pivot(
            oracle,
            rng,
            current,
            self.volatility,
            self.reference_tick,
            &self.pivot,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsim_pool::GeometricOracle;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_corridor_brackets_pivot() {
        let oracle = GeometricOracle::new();
        for volatility in [dec!(0.001), dec!(0.01), dec!(0.05), dec!(0.3), dec!(2)] {
            for pivot in [-200_000, -1, 0, 1, 76_012, 114_445, 300_000] {
                let corridor = derive_corridor(&oracle, pivot, volatility).unwrap();
                assert!(corridor.left_tick <= pivot && pivot <= corridor.right_tick);
                assert!(corridor.right_tick - corridor.left_tick >= 1);
            }
        }
    }

    #[test]
    fn test_reference_scenario_width() {
        let oracle = GeometricOracle::new();
        let corridor = derive_corridor(&oracle, 114_445, dec!(0.05)).unwrap();

        // ln(1.05) / ln(1.0001) = 487.9..
        assert_eq!(corridor, PriceCorridor::new(114_445 - 487, 114_445 + 487));
        assert!(corridor.left_tick < 114_445 && 114_445 < corridor.right_tick);
    }

    #[test]
    fn test_sub_tick_volatility_is_config_error() {
        let oracle = GeometricOracle::new();
        let err = derive_corridor(&oracle, 114_445, dec!(0.00001)).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::ConfigInconsistency { pivot: 114_445, .. }
        ));

        assert!(derive_corridor(&oracle, 0, Decimal::ZERO).is_err());
    }

    #[test]
    fn test_next_pivot_lands_on_an_edge() {
        let oracle = GeometricOracle::new();
        let mut rng = StdRng::seed_from_u64(42);
        let model = CorridorModel::new(dec!(0.05), 114_445, PivotConfig::default());
        let corridor = model.corridor(&oracle, 114_445).unwrap();

        for _ in 0..50 {
            let pivot = model.next_pivot(&oracle, &mut rng, 114_445).unwrap();
            assert!(pivot == corridor.left_tick || pivot == corridor.right_tick);
        }
    }

    #[test]
    fn test_coin_flip_when_reference_inside() {
        let oracle = GeometricOracle::new();
        let mut rng = StdRng::seed_from_u64(7);
        let config = PivotConfig::default();
        let corridor = derive_corridor(&oracle, 0, dec!(0.05)).unwrap();

        let draws = 4_000;
        let lefts = (0..draws)
            .filter(|_| {
                next_pivot(&oracle, &mut rng, 0, dec!(0.05), 0, &config).unwrap()
                    == corridor.left_tick
            })
            .count();

        let share = lefts as f64 / draws as f64;
        assert!((share - 0.5).abs() < 0.05, "left share {:.3}", share);
    }

    #[test]
    fn test_pull_toward_reference() {
        let oracle = GeometricOracle::new();
        let mut rng = StdRng::seed_from_u64(11);
        let config = PivotConfig::default();

        // Pivot far above the reference: corridor entirely above
        let high = 10_000;
        let corridor = derive_corridor(&oracle, high, dec!(0.05)).unwrap();
        assert!(corridor.is_above(0));
        let lefts = (0..2_000)
            .filter(|_| {
                next_pivot(&oracle, &mut rng, high, dec!(0.05), 0, &config).unwrap()
                    == corridor.left_tick
            })
            .count();
        assert!(lefts >= 1_940, "only {} of 2000 pulled left", lefts);

        // Pivot far below: pulled right
        let low = -10_000;
        let corridor = derive_corridor(&oracle, low, dec!(0.05)).unwrap();
        assert!(corridor.is_below(0));
        let rights = (0..2_000)
            .filter(|_| {
                next_pivot(&oracle, &mut rng, low, dec!(0.05), 0, &config).unwrap()
                    == corridor.right_tick
            })
            .count();
        assert!(rights >= 1_940, "only {} of 2000 pulled right", rights);
    }

    #[test]
    fn test_certain_pull_probability() {
        let oracle = GeometricOracle::new();
        let mut rng = StdRng::seed_from_u64(3);
        let config = PivotConfig {
            escape_probability: dec!(0.5),
            pull_probability: Decimal::ONE,
        };
        let corridor = derive_corridor(&oracle, 5_000, dec!(0.05)).unwrap();
        for _ in 0..200 {
            let pivot = next_pivot(&oracle, &mut rng, 5_000, dec!(0.05), 0, &config).unwrap();
            assert_eq!(pivot, corridor.left_tick);
        }
    }

    #[test]
    fn test_model_anchors_to_opening_tick() {
        let model = CorridorModel::from_config(&CorridorConfig::default(), 1_234);
        assert_eq!(model.reference_tick(), 1_234);

        let config = CorridorConfig {
            reference_tick: Some(99),
            ..Default::default()
        };
        assert_eq!(CorridorModel::from_config(&config, 1_234).reference_tick(), 99);
    }
}
