use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two assets of the traded pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSide {
    Base,
    Quote,
}

impl AssetSide {
    /// Returns the other asset
    pub fn opposite(&self) -> Self {
        match self {
            AssetSide::Base => AssetSide::Quote,
            AssetSide::Quote => AssetSide::Base,
        }
    }
}

impl fmt::Display for AssetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSide::Base => write!(f, "base"),
            AssetSide::Quote => write!(f, "quote"),
        }
    }
}

/// Trade direction, named by the asset that flows into the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Sell base into the pool; pushes the tick down
    BaseToQuote,
    /// Buy base from the pool; pushes the tick up
    QuoteToBase,
}

impl Direction {
    /// Returns the opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            Direction::BaseToQuote => Direction::QuoteToBase,
            Direction::QuoteToBase => Direction::BaseToQuote,
        }
    }

    /// Asset the trader pays in
    pub fn input_side(&self) -> AssetSide {
        match self {
            Direction::BaseToQuote => AssetSide::Base,
            Direction::QuoteToBase => AssetSide::Quote,
        }
    }

    /// Asset the trader receives
    pub fn output_side(&self) -> AssetSide {
        self.input_side().opposite()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::BaseToQuote => write!(f, "base->quote"),
            Direction::QuoteToBase => write!(f, "quote->base"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sides() {
        assert_eq!(Direction::BaseToQuote.input_side(), AssetSide::Base);
        assert_eq!(Direction::BaseToQuote.output_side(), AssetSide::Quote);
        assert_eq!(Direction::QuoteToBase.input_side(), AssetSide::Quote);
        assert_eq!(Direction::QuoteToBase.opposite(), Direction::BaseToQuote);
    }
}
