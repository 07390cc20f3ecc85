//! Flowsim Engine - synthetic order flow for an AMM demo
//!
//! Three components run in a closed loop with an external pool:
//!
//! - **Corridor & Pivot Model**: tick band around a pivot, derived from
//!   volatility; the pivot re-draws at each day rollover
//! - **Trade Generator**: one direction + size per call, bounded by the
//!   pool's estimated price impact
//! - **Day Cycle Aggregator**: per-day volume target, 29-day trailing
//!   windows and intraday samples
//!
//! ## Loop
//!
//! ```text
//!        ┌────────────────┐  corridor   ┌────────────────┐
//!        │   Day Cycle    │────────────►│ Trade Generator│
//!        │   Aggregator   │             └───────┬────────┘
//!        └───────▲────────┘                     │ TradeIntent
//!                │ volume, fees                 ▼
//!                │                      ┌────────────────┐
//!                └──────────────────────│      Pool      │
//!                                       └────────────────┘
//! ```
//!
//! `MetricsSnapshot::assemble` reads pool + aggregator state without
//! mutating either.

pub mod corridor;
pub mod day_cycle;
pub mod generator;
pub mod metrics;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types
pub use corridor::{CorridorConfig, CorridorModel, PivotConfig, derive_corridor, next_pivot};
pub use day_cycle::{
    DayCycle, DayCycleAggregator, DayCycleConfig, DayRollover, IntradayKind, TrailingKind,
};
pub use generator::{GeneratorConfig, SizeLimits, TradeDecision, TradeGenerator};
pub use metrics::{AssetMetrics, MetricsSnapshot};
pub use window::{BoundedWindow, ResettableWindow, TRAILING_DEPTH};
