//! Flowsim Core Domain
//!
//! Pure domain types for the synthetic order-flow simulator.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    AssetSide, Direction, PerSide, PriceCorridor, SideStats, SwapOutcome, TradeIntent,
};
pub use values::{Amount, Tick, Timestamp, format_fixed, format_short, random_unit};
