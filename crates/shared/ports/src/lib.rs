//! Flowsim Ports
//!
//! Port definitions (traits) for the order-flow simulator.
//! These define the boundaries between the engine and the collaborators it
//! consumes but does not implement: the AMM pool and the tick/price oracle.

mod error;
mod oracle;
mod pool;

pub use error::{SimulationError, SimulationResult};
pub use oracle::TickOracle;
pub use pool::LiquidityPool;
