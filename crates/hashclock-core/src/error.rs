//! Error types for the hashclock core.

use thiserror::Error;

use crate::backend::BackendId;

/// Errors that can occur during backend resolution and engine setup.
///
/// The step transition itself cannot fail: malformed buffer sizes are
/// engine bugs and panic rather than surfacing here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested backend id is not registered.
    #[error("unknown compression backend id {0}")]
    UnknownBackend(BackendId),

    /// The backend exists but a hardware feature it requires is
    /// unavailable on this machine.
    #[error("compression backend {id} ({name}) is not supported on this host")]
    UnsupportedBackend {
        /// The requested id.
        id: BackendId,
        /// The backend's name.
        name: &'static str,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, EngineError>;
