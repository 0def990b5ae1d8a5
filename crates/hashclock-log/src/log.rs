//! The append-only checkpoint log file.
//!
//! `append` writes one record at the end of the file and fsyncs before
//! returning; a checkpoint is committed only once that completes.
//! `recover` inspects the trailing record only; it never rewrites and
//! never validates the whole file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{LogError, Result};
use crate::record::{Checkpoint, RECORD_LEN};

/// An append-only log of checkpoint records.
///
/// The write handle is opened in append mode; nothing ever seeks it
/// backward. Recovery reads through a separate handle, so calling
/// `recover` repeatedly with no intervening `append` returns the same
/// answer.
pub struct CheckpointLog {
    path: PathBuf,
    file: File,
    last_step: Option<u64>,
}

impl CheckpointLog {
    /// Open a log at the given path, creating it if absent, and
    /// position the monotonicity cursor from the trailing record.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut log = Self {
            path,
            file,
            last_step: None,
        };
        log.last_step = log.recover()?.map(|c| c.step);
        Ok(log)
    }

    /// The path this log writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The step of the last durable checkpoint, if any.
    pub fn last_step(&self) -> Option<u64> {
        self.last_step
    }

    /// Recover the trailing checkpoint.
    ///
    /// Reads the last complete, record-aligned entry. A sub-record tail
    /// (torn append) is ignored; a trailing record that fails its
    /// checksum yields `None` rather than a fabricated state. Callers
    /// getting `None` start a new chain from genesis.
    pub fn recover(&self) -> Result<Option<Checkpoint>> {
        let mut reader = File::open(&self.path)?;
        let len = reader.metadata()?.len();

        let torn = (len % RECORD_LEN as u64) as usize;
        if torn != 0 {
            warn!(len, torn, "ignoring torn tail in checkpoint log");
        }

        let complete = len / RECORD_LEN as u64;
        if complete == 0 {
            return Ok(None);
        }

        reader.seek(SeekFrom::Start((complete - 1) * RECORD_LEN as u64))?;
        let mut buf = [0u8; RECORD_LEN];
        reader.read_exact(&mut buf)?;

        match Checkpoint::decode(&buf) {
            Some(checkpoint) => {
                debug!(step = checkpoint.step, digest = %checkpoint.digest, "recovered checkpoint");
                Ok(Some(checkpoint))
            }
            None => {
                warn!("trailing checkpoint record failed its checksum; starting fresh");
                Ok(None)
            }
        }
    }

    /// Append one checkpoint and force it to durable storage.
    ///
    /// Returns only after the record is flushed and fsynced; an error
    /// here means the durability guarantee is void for this run and the
    /// caller must stop advancing the chain.
    pub fn append(&mut self, checkpoint: &Checkpoint) -> Result<()> {
        if let Some(last) = self.last_step {
            if checkpoint.step <= last {
                return Err(LogError::NonMonotonic {
                    last,
                    attempted: checkpoint.step,
                });
            }
        }

        self.file.write_all(&checkpoint.encode())?;
        self.file.flush()?;
        self.file.sync_data()?;

        self.last_step = Some(checkpoint.step);
        debug!(step = checkpoint.step, "appended checkpoint");
        Ok(())
    }
}
