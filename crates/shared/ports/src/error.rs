use flowsim_core::{Amount, AssetSide, Tick};
use thiserror::Error;

/// Fatal conditions that abort a simulation run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Volatility too small to represent at the pool's tick granularity
    #[error(
        "Configuration inconsistency: volatility {volatility} at pivot {pivot} resolves to a corridor width of {width} ticks (need at least 1)"
    )]
    ConfigInconsistency {
        pivot: Tick,
        volatility: Amount,
        width: i64,
    },

    /// A trade decreased a side's total reserve; pool accounting is corrupt
    #[error("Invariant violation: {side} reserve decreased from {before} to {after}")]
    InvariantViolation {
        side: AssetSide,
        before: Amount,
        after: Amount,
    },
}

pub type SimulationResult<T> = std::result::Result<T, SimulationError>;
