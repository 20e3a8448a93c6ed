// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lock::DaemonError;

/// Resolve state directory: STREAMVAULT_STATE_DIR > XDG_STATE_HOME/streamvault > ~/.local/state/streamvault
pub fn state_dir() -> Result<PathBuf, DaemonError> {
    if let Ok(dir) = std::env::var("STREAMVAULT_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("streamvault"));
    }
    let home = std::env::var("HOME").map_err(|_| DaemonError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/streamvault"))
}

/// Postgres connection string (required; no embedded fallback, §4.2).
pub fn database_url() -> Result<String, DaemonError> {
    std::env::var("STREAMVAULT_DATABASE_URL").map_err(|_| DaemonError::NoDatabaseUrl)
}

/// Root directory recordings and their post-processing artifacts live
/// under (§6 on-disk layout).
pub fn recordings_root() -> PathBuf {
    std::env::var("STREAMVAULT_RECORDINGS_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/var/lib/streamvault/recordings"))
}

/// TCP port the WebSocket fan-out (C11) listens on.
pub fn fanout_port() -> u16 {
    std::env::var("STREAMVAULT_FANOUT_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9191)
}

/// Reaper sweep interval override (§4.9 default: 30s).
pub fn reaper_interval() -> Duration {
    std::env::var("STREAMVAULT_REAPER_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(30))
}

/// Cleanup sweep interval override (§4.11 default: 1 hour).
pub fn cleanup_interval() -> Duration {
    std::env::var("STREAMVAULT_CLEANUP_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(60 * 60))
}
