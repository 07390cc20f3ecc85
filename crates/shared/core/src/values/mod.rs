use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;

mod format;

pub use format::{format_fixed, format_short};

/// Monetary or quantity value - always Decimal, never f64
pub type Amount = Decimal;

/// Discrete index into the pool's price grid (monotonic with price)
pub type Tick = i32;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Resolution of uniform draws: 10^-9
const UNIT_GRID_SCALE: u32 = 9;
const UNIT_GRID: i64 = 1_000_000_000;

/// Draw a uniform value in [0, 1) on a 10^-9 decimal grid
///
/// Keeps random draws inside exact arithmetic so comparisons against
/// decimal probabilities never round through a float.
pub fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Amount {
    Decimal::new(rng.gen_range(0..UNIT_GRID), UNIT_GRID_SCALE)
}
