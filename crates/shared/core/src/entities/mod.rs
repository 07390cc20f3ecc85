mod corridor;
mod direction;
mod intent;
mod per_side;
mod swap;

pub use corridor::PriceCorridor;
pub use direction::{AssetSide, Direction};
pub use intent::TradeIntent;
pub use per_side::{PerSide, SideStats};
pub use swap::SwapOutcome;
