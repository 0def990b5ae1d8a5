//! Error types for the checkpoint log.

use thiserror::Error;

/// Errors that can occur during log operations.
///
/// Any error from `append` is fatal for the run: once a write cannot be
/// confirmed durable, advancing the in-memory chain further would void
/// the crash-truncation guarantee.
#[derive(Debug, Error)]
pub enum LogError {
    /// I/O error reading or writing the log file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Attempted to append a checkpoint that does not advance the chain.
    #[error("non-monotonic checkpoint: last appended step {last}, attempted {attempted}")]
    NonMonotonic {
        /// The step of the last durable checkpoint.
        last: u64,
        /// The step of the rejected append.
        attempted: u64,
    },
}

/// Result type for log operations.
pub type Result<T> = std::result::Result<T, LogError>;
