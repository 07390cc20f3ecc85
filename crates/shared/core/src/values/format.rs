//! Text renderings for decimal amounts

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Render with exactly `decimals` fractional digits (half away from zero)
pub fn format_fixed(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimals as usize, rounded)
}

/// Humanized rendering: "12.5B", "1.2M", "950.3K", "3.21"
pub fn format_short(value: Decimal) -> String {
    let magnitude = value.abs();
    let (scaled, suffix) = if magnitude >= dec!(1_000_000_000) {
        (value / dec!(1_000_000_000), "B")
    } else if magnitude >= dec!(1_000_000) {
        (value / dec!(1_000_000), "M")
    } else if magnitude >= dec!(1_000) {
        (value / dec!(1_000), "K")
    } else {
        return format_fixed(value, 2);
    };
    format!("{}{}", format_fixed(scaled, 1), suffix)
}
