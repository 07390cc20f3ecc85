//! Flowsim Pool - reference collaborators
//!
//! The order-flow engine only consumes the pool and oracle through the
//! `flowsim-ports` traits. This crate supplies one implementation of each so
//! a simulation can run end to end:
//!
//! - **GeometricOracle**: `price(tick) = 1.0001^tick`
//! - **LadderPool**: two-sided range-order ladder that earns fees on every fill
//!
//! ## Ladder layout
//!
//! ```text
//!   quote side deposit           base side deposit
//!   (buys base as price falls)   (sells base as price rises)
//! |q|q|q|q|q|q|q|q|  cur  |b|b|b|b|b|b|b|b|
//!  cur-N ... cur-1          cur+1 ... cur+N
//! ```
//!
//! A level that has been traded through holds the counter-asset of whoever
//! owned it. That inventory is what each side expects to recover on exit.

pub mod error;
pub mod ladder;
pub mod oracle;

pub use error::{PoolError, Result};
pub use ladder::{LadderConfig, LadderPool};
pub use oracle::{GeometricOracle, MAX_TICK, MIN_TICK, TICK_BASE};
