//! # Hashclock Core
//!
//! Pure primitives for the hashclock delay generator: the sequential
//! SHA-256 chain step engine, the compression backend contract, and
//! backend selection.
//!
//! This crate contains no I/O. Everything here is deterministic
//! computation over fixed-size buffers.
//!
//! ## Key Types
//!
//! - [`Digest`] - A 256-bit chain digest, 8 u32 words
//! - [`MessageBlock`] - The 512-bit compression input, always the
//!   previous digest duplicated into both halves
//! - [`ChainState`] - (step, digest, block) owned by the engine
//! - [`ChainEngine`] - Performs the per-step transition
//! - [`BackendRegistry`] - Resolves backend ids to implementations
//!
//! ## The step transition
//!
//! Every step compresses the fixed IV against the current message
//! block, then duplicates the resulting digest into both halves of
//! the next block. The chain dependency flows entirely through the
//! block, never through a carried compression state: knowing the
//! digest at step N requires having performed N sequential
//! compressions.

pub mod backend;
pub mod digest;
pub mod engine;
pub mod error;
pub mod params;
pub mod registry;

pub use backend::{AcceleratedBackend, BackendId, CompressionBackend, PortableBackend, BLOCK_LEN};
pub use digest::{Digest, MessageBlock};
pub use engine::{ChainEngine, ChainState};
pub use error::{EngineError, Result};
pub use params::{ChainId, ChainParams};
pub use registry::{BackendRegistry, SelectionPolicy};
