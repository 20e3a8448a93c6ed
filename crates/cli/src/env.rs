// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

use crate::client::ClientError;

/// Resolve state directory: STREAMVAULT_STATE_DIR > XDG_STATE_HOME/streamvault > ~/.local/state/streamvault
pub fn state_dir() -> Result<PathBuf, ClientError> {
    if let Ok(dir) = std::env::var("STREAMVAULT_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("streamvault"));
    }
    let home = std::env::var("HOME").map_err(|_| ClientError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/streamvault"))
}

/// Override for the `streamvaultd` binary path (tests, non-standard installs).
pub fn daemon_binary() -> Option<String> {
    std::env::var("STREAMVAULT_DAEMON_BINARY").ok()
}

pub fn cargo_manifest_dir() -> Option<String> {
    std::env::var("CARGO_MANIFEST_DIR").ok()
}
