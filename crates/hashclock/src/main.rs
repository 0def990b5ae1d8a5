//! Thin CLI over the driver.
//!
//! `hashclock <iterations-per-batch> <backend-id> <log-path>` runs
//! batches until externally terminated, appending one checkpoint per
//! batch and logging per-batch throughput. Any configuration error
//! exits with status 1.

use std::path::PathBuf;
use std::process;
use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hashclock::core::BackendId;
use hashclock::log::CheckpointLog;
use hashclock::{Driver, DriverConfig};

#[derive(Parser, Debug)]
#[command(
    name = "hashclock",
    about = "Sequential hash-chain delay generator",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Steps to advance between checkpoints.
    iterations_per_batch: u64,

    /// Compression backend id (0 = portable, 1 = accelerated).
    backend_id: u8,

    /// Path of the append-only checkpoint log.
    log_path: PathBuf,

    /// Stop after this many batches instead of running forever.
    #[arg(long)]
    max_batches: Option<u64>,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let log = CheckpointLog::open(&cli.log_path)
        .with_context(|| format!("opening checkpoint log {}", cli.log_path.display()))?;

    let config = DriverConfig {
        batch_size: cli.iterations_per_batch,
        backend: Some(BackendId(cli.backend_id)),
        max_batches: cli.max_batches,
    };
    let mut driver = Driver::new(config, log)?;

    // No in-process shutdown source: the sender is held for the whole
    // run and the loop stops only via --max-batches or external
    // termination.
    let (_shutdown, shutdown_rx) = mpsc::channel();
    let summary = driver.run(&shutdown_rx)?;

    tracing::info!(
        batches = summary.batches,
        step = summary.final_step,
        digest = %summary.final_digest,
        "run finished"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::try_parse().unwrap_or_else(|err| {
        let _ = err.print();
        process::exit(1);
    });

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}
