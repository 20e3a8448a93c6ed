// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance guard: an exclusive lock on `daemon.pid` under the
//! state directory, held for the process lifetime.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use fs2::FileExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("cannot determine state directory (set STREAMVAULT_STATE_DIR or HOME)")]
    NoStateDir,
    #[error("STREAMVAULT_DATABASE_URL is not set")]
    NoDatabaseUrl,
    #[error("another streamvaultd instance is already running (lock held)")]
    LockFailed,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(#[from] streamvault_storage::StorageError),
}

/// Directory layout rooted at the state dir (§9 REDESIGN FLAG: no WAL,
/// no snapshot — Postgres via the Gateway is the only durable store).
#[derive(Debug, Clone)]
pub struct Paths {
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub lock_path: PathBuf,
    pub log_path: PathBuf,
}

impl Paths {
    pub fn resolve() -> Result<Self, DaemonError> {
        let state_dir = crate::env::state_dir()?;
        Ok(Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            state_dir,
        })
    }
}

/// Holds the exclusive lock for as long as it's alive; dropping it
/// releases the lock (the file itself is left behind, as `daemon.pid`
/// doubles as the PID file the CLI reads to signal the process).
pub struct LockGuard {
    #[allow(dead_code)]
    file: File,
}

pub fn acquire(paths: &Paths) -> Result<LockGuard, DaemonError> {
    std::fs::create_dir_all(&paths.state_dir)?;
    let mut file = std::fs::OpenOptions::new().create(true).write(true).truncate(false).open(&paths.lock_path)?;
    file.try_lock_exclusive().map_err(|_| DaemonError::LockFailed)?;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(LockGuard { file })
}
