//! Error types for the driver.

use thiserror::Error;

/// Errors that can occur while driving a chain.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Backend resolution or engine configuration failed.
    #[error(transparent)]
    Engine(#[from] hashclock_core::EngineError),

    /// The checkpoint log failed; the run must stop because further
    /// advancement could not be made durable.
    #[error(transparent)]
    Log(#[from] hashclock_log::LogError),

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
