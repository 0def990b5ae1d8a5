//! # Hashclock
//!
//! A "delay" generator: a long sequential chain of SHA-256 compressions
//! where each step depends strictly on the previous step's output. The
//! only way to know step N's digest is to have performed N sequential
//! compressions, so elapsed chain length is a proxy for elapsed serial
//! computation.
//!
//! This crate ties the pieces together: the [`Driver`] recovers the
//! trailing checkpoint from a [`CheckpointLog`], advances the chain in
//! fixed batches through a [`ChainEngine`], and commits one checkpoint
//! per batch.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::mpsc;
//!
//! use hashclock::{Driver, DriverConfig};
//! use hashclock::core::BackendId;
//! use hashclock::log::CheckpointLog;
//!
//! let log = CheckpointLog::open("chain.log").unwrap();
//! let config = DriverConfig {
//!     batch_size: 1_000_000,
//!     backend: Some(BackendId::ACCELERATED),
//!     max_batches: None,
//! };
//! let mut driver = Driver::new(config, log).unwrap();
//!
//! // The driver runs until the shutdown channel fires (or its sender
//! // is dropped) and stops cleanly between batches.
//! let (_shutdown, shutdown_rx) = mpsc::channel();
//! let summary = driver.run(&shutdown_rx).unwrap();
//! println!("reached step {}", summary.final_step);
//! ```

pub mod driver;
pub mod error;

// Re-export component crates
pub use hashclock_core as core;
pub use hashclock_log as log;

pub use driver::{Driver, DriverConfig, RunSummary};
pub use error::{DriverError, Result};
