use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid ladder: {0}")]
    InvalidLadder(String),
}

pub type Result<T> = std::result::Result<T, PoolError>;
