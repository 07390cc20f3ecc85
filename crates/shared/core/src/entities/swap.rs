use serde::{Deserialize, Serialize};

use crate::values::Amount;

/// What a pool reports back after executing a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    /// Input actually charged, fee included; below the request when the
    /// pool runs out of liquidity
    pub amount_in: Amount,
    /// Realized fee rate as a fraction (0.003 = 0.3%)
    pub fee_factor: Amount,
    /// Fees collected, in the input asset
    pub fees_in: Amount,
    /// Realized slippage as a fraction of the pre-trade price
    pub slippage: Amount,
}
