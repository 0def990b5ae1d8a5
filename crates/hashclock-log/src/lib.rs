//! # Hashclock Log
//!
//! The append-only checkpoint log that makes a chain resumable.
//!
//! A checkpoint binds a step index to the digest the chain had reached
//! at that step. The log persists checkpoints at coarse intervals (one
//! per driver batch) and, on startup, recovers the trailing checkpoint
//! so the chain continues exactly where it left off.
//!
//! Crash loss is always a clean truncation: a crash between checkpoints
//! drops the unflushed batch, never corrupts the file, never forks the
//! chain.

pub mod error;
pub mod log;
pub mod record;

pub use error::{LogError, Result};
pub use log::CheckpointLog;
pub use record::{Checkpoint, RECORD_LEN};
