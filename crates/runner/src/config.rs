//! Configuration loading for the simulator
//!
//! One JSON file with optional sections; anything missing falls back to
//! the BTC/USDT demo defaults:
//!
//! ```json
//! {
//!   "market": { "initial_tick": 114445, "base_deposit": "10", "quote_deposit": "1000000" },
//!   "corridor": { "volatility": "0.05" },
//!   "pacing": { "base_interval_ms": 1000, "max_speed": 100 },
//!   "seed": 42
//! }
//! ```

use crate::error::ConfigError;
use crate::pacing::PacingConfig;
use flowsim_core::{Amount, PerSide, Tick};
use flowsim_engine::{
    CorridorConfig, DayCycleConfig, GeneratorConfig, SizeLimits, derive_corridor,
};
use flowsim_pool::{GeometricOracle, LadderConfig, MAX_TICK, MIN_TICK};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub market: MarketConfig,
    pub generator: GeneratorConfig,
    pub corridor: CorridorConfig,
    pub day_cycle: DayCycleConfig,
    pub pacing: PacingConfig,
    /// RNG seed; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            generator: GeneratorConfig::default(),
            corridor: CorridorConfig::default(),
            day_cycle: DayCycleConfig::default(),
            pacing: PacingConfig::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with
    ///
    /// A volatility too small for the tick grid only surfaces when the
    /// corridor is first derived, as `SimulationError::ConfigInconsistency`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.market.validate()?;

        for (asset, limits) in [("base", self.generator.base), ("quote", self.generator.quote)] {
            validate_limits(asset, &limits)?;
        }

        if self.corridor.volatility <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "volatility must be positive, got {}",
                self.corridor.volatility
            )));
        }
        // The opening corridor must sit on funded levels
        if let Ok(corridor) = derive_corridor(
            &GeometricOracle::new(),
            self.market.initial_tick,
            self.corridor.volatility,
        ) {
            let width = corridor.right_tick - self.market.initial_tick;
            if (self.market.half_width_ticks as i64) < width as i64 {
                return Err(ConfigError::Invalid(format!(
                    "half_width_ticks {} narrower than the {}-tick corridor at volatility {}",
                    self.market.half_width_ticks, width, self.corridor.volatility
                )));
            }
        }
        for (name, p) in [
            ("escape_probability", self.corridor.pivot.escape_probability),
            ("pull_probability", self.corridor.pivot.pull_probability),
        ] {
            if p < Decimal::ZERO || p > Decimal::ONE {
                return Err(ConfigError::Invalid(format!("{} {} outside [0, 1]", name, p)));
            }
        }

        if self.day_cycle.target_multiplier <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "target_multiplier must be positive, got {}",
                self.day_cycle.target_multiplier
            )));
        }
        match self.day_cycle.initial_target {
            Some(target) if target <= Decimal::ZERO => {
                return Err(ConfigError::Invalid(format!(
                    "initial_target must be positive, got {}",
                    target
                )));
            }
            _ => {}
        }

        self.pacing.validate()
    }
}

fn validate_limits(asset: &str, limits: &SizeLimits) -> Result<(), ConfigError> {
    if limits.floor <= Decimal::ZERO {
        return Err(ConfigError::Invalid(format!(
            "{} floor must be positive, got {}",
            asset, limits.floor
        )));
    }
    if limits.floor > limits.default {
        return Err(ConfigError::Invalid(format!(
            "{} floor {} exceeds default {}",
            asset, limits.floor, limits.default
        )));
    }
    Ok(())
}

/// Traded pair and the reference pool's opening state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub base_symbol: String,
    pub quote_symbol: String,
    pub initial_tick: Tick,
    pub base_deposit: Amount,
    pub quote_deposit: Amount,
    /// Ladder levels funded on each side of the opening tick
    pub half_width_ticks: u32,
    pub fee_factor: Amount,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_symbol: "BTC".to_string(),
            quote_symbol: "USDT".to_string(),
            initial_tick: 114_445,
            base_deposit: dec!(10),
            quote_deposit: dec!(1_000_000),
            half_width_ticks: 2_000,
            fee_factor: dec!(0.003),
        }
    }
}

impl MarketConfig {
    pub fn ladder_config(&self) -> LadderConfig {
        LadderConfig {
            initial_tick: self.initial_tick,
            deposit: PerSide::new(self.base_deposit, self.quote_deposit),
            half_width_ticks: self.half_width_ticks,
            fee_factor: self.fee_factor,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TICK..=MAX_TICK).contains(&self.initial_tick) {
            return Err(ConfigError::Invalid(format!(
                "initial_tick {} outside [{}, {}]",
                self.initial_tick, MIN_TICK, MAX_TICK
            )));
        }
        let reach = self.half_width_ticks as i64;
        if self.half_width_ticks == 0
            || (self.initial_tick as i64) - reach < MIN_TICK as i64
            || (self.initial_tick as i64) + reach > MAX_TICK as i64
        {
            return Err(ConfigError::Invalid(format!(
                "half_width_ticks {} around tick {} must be at least 1 and stay within [{}, {}]",
                self.half_width_ticks, self.initial_tick, MIN_TICK, MAX_TICK
            )));
        }
        if self.base_deposit <= Decimal::ZERO || self.quote_deposit <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "deposits must be positive ({} {}, {} {})",
                self.base_deposit, self.base_symbol, self.quote_deposit, self.quote_symbol
            )));
        }
        if self.fee_factor < Decimal::ZERO || self.fee_factor >= Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "fee_factor {} outside [0, 1)",
                self.fee_factor
            )));
        }
        Ok(())
    }
}
