//! Flowsim Runner - drives the synthetic order-flow engine
//!
//! - **Config**: JSON file with per-section defaults
//! - **Simulation**: pool + generator + day cycle, one synchronous `step` per trade
//! - **Driver**: single task pacing trades, sampling metrics and taking commands
//!
//! ## Architecture
//!
//! ```text
//!   SimulationHandle ── Pause / Resume / SetSpeed / Stop ──┐
//!          ▲                                               ▼
//!          │ watch<MetricsSnapshot>            ┌───────────────────────┐
//!          └───────────────────────────────────│     driver task       │
//!                                              │  ┌─────────────────┐  │
//!                                              │  │   Simulation    │  │
//!                                              │  │ pool · engine   │  │
//!                                              │  └─────────────────┘  │
//!                                              └───────────────────────┘
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod pacing;
pub mod simulation;

// Re-export main types
pub use config::{MarketConfig, SimulationConfig};
pub use driver::{Command, RunSummary, SimulationHandle, SimulationRunner};
pub use error::{ConfigError, Result, RunnerError};
pub use pacing::PacingConfig;
pub use simulation::{LadderSimulation, Simulation, TradeReport};
