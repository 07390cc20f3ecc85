use flowsim_pool::PoolError;
use flowsim_ports::SimulationError;
use thiserror::Error;

/// Configuration loading and validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Pool setup failed: {0}")]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("Simulation task stopped")]
    Stopped,

    #[error("Simulation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
