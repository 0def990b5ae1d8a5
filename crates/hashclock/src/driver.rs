//! The driver: recover, advance in batches, checkpoint, repeat.
//!
//! One checkpoint is appended per batch, not per step; a crash between
//! checkpoints loses only the in-flight batch, and the restarted chain
//! is a true prefix of what the uncrashed run would have produced.
//! There is no partial-batch state to roll back because `append` only
//! happens after a full batch of steps completes in memory.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use tracing::info;

use hashclock_core::{BackendId, BackendRegistry, ChainEngine, ChainParams, Digest};
use hashclock_log::{Checkpoint, CheckpointLog};

use crate::error::{DriverError, Result};

/// Configuration for a driver run.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Steps advanced between checkpoints.
    pub batch_size: u64,
    /// Pin a specific backend; `None` lets the registry policy choose.
    pub backend: Option<BackendId>,
    /// Stop after this many batches; `None` runs until cancelled.
    pub max_batches: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            batch_size: 1_000_000,
            backend: None,
            max_batches: None,
        }
    }
}

/// What a finished run accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Batches committed this run.
    pub batches: u64,
    /// Step index of the last committed checkpoint (or the recovered
    /// one, if no batch completed).
    pub final_step: u64,
    /// Digest at `final_step`.
    pub final_digest: Digest,
}

/// Drives one chain against one checkpoint log.
pub struct Driver {
    config: DriverConfig,
    engine: ChainEngine,
    log: CheckpointLog,
}

impl Driver {
    /// Build a driver, resolving the backend once up front so a bad id
    /// or missing hardware feature fails at startup, not mid-chain.
    pub fn new(config: DriverConfig, log: CheckpointLog) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(DriverError::InvalidConfig(
                "batch_size must be at least 1".into(),
            ));
        }

        let registry = BackendRegistry::builtin();
        // The chain path compresses one block per call.
        let backend = registry.select(1, config.backend)?;
        let engine = ChainEngine::new(ChainParams::standard(), backend);

        Ok(Self {
            config,
            engine,
            log,
        })
    }

    /// The engine this driver advances.
    pub fn engine(&self) -> &ChainEngine {
        &self.engine
    }

    /// Run batches until the shutdown channel fires, its sender drops,
    /// or `max_batches` is reached.
    ///
    /// Stops only between batches; the log always reflects a valid
    /// prior checkpoint, so cancellation needs no teardown.
    pub fn run(&mut self, shutdown: &Receiver<()>) -> Result<RunSummary> {
        let mut state = match self.log.recover()? {
            Some(checkpoint) => {
                info!(
                    step = checkpoint.step,
                    digest = %checkpoint.digest,
                    "resuming chain from checkpoint"
                );
                checkpoint.to_state()
            }
            None => {
                let genesis = self.engine.genesis();
                info!(chain_id = %self.engine.chain_id(), "starting new chain from genesis");
                genesis
            }
        };

        let mut batches = 0u64;
        loop {
            match shutdown.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }
            if let Some(max) = self.config.max_batches {
                if batches >= max {
                    break;
                }
            }

            let started = Instant::now();
            self.engine.advance_n(&mut state, self.config.batch_size);
            self.log.append(&Checkpoint::from_state(&state))?;
            let elapsed = started.elapsed();

            let steps_per_sec = self.config.batch_size as f64 / elapsed.as_secs_f64();
            info!(
                step = state.step(),
                digest = %state.digest(),
                backend = self.engine.backend().name(),
                steps_per_sec = format_args!("{steps_per_sec:.0}"),
                us_per_step = format_args!("{:.3}", elapsed.as_micros() as f64 / self.config.batch_size as f64),
                "batch committed"
            );
            batches += 1;
        }

        Ok(RunSummary {
            batches,
            final_step: state.step(),
            final_digest: *state.digest(),
        })
    }
}
