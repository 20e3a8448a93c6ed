// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle and diagnostic logging for the CLI client.

use std::path::PathBuf;

use crate::client::ClientError;
use crate::daemon_process::{daemon_dir, daemon_socket, stop_daemon_sync};

/// Stop the daemon (SIGTERM, escalating to SIGKILL) and clean up its PID file.
/// Returns true if a daemon was actually running, false if it wasn't.
pub fn daemon_stop(kill: bool) -> bool {
    stop_daemon_sync(kill)
}

/// Write a diagnostic message to `~/.local/state/streamvault/cli.log`.
fn write_cli_log(message: String) {
    use std::io::Write;
    use std::time::SystemTime;

    let log_path = daemon_dir()
        .unwrap_or_else(|_| {
            std::env::var("HOME")
                .map(|h| PathBuf::from(h).join(".local/state/streamvault"))
                .unwrap_or_else(|_| PathBuf::from("/tmp"))
        })
        .join("cli.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    if let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(&log_path) {
        let timestamp =
            SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
        let pid = std::process::id();
        let cwd = std::env::current_dir().map(|p| p.display().to_string()).unwrap_or_else(|_| "(unknown)".to_string());
        let state_dir = std::env::var("STREAMVAULT_STATE_DIR").unwrap_or_else(|_| "(not set)".to_string());

        let _ = writeln!(
            file,
            "[ts={timestamp}] pid={pid} cwd={cwd} STREAMVAULT_STATE_DIR={state_dir} {message}"
        );
    }
}

/// Log a connection error for debugging.
///
/// Writes diagnostic info to `~/.local/state/streamvault/cli.log` when the CLI
/// fails to connect to the daemon, since a spawned process's stdout/stderr
/// may not be visible to the caller.
pub fn log_connection_error(error: &ClientError) {
    let socket_path = daemon_socket().map(|p| p.display().to_string()).unwrap_or_else(|_| "(unknown)".to_string());
    write_cli_log(format!("socket={socket_path} error={error}"));
}
