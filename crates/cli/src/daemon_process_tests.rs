// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for daemon process lifecycle utilities.

#![allow(clippy::unwrap_used)]

use super::*;
use serial_test::serial;
use tempfile::tempdir;

#[test]
fn parse_startup_error_finds_error_lines_after_marker() {
    let content = "\
some unrelated earlier log line
--- streamvaultd: starting (pid: 123) ---
2026-01-01T00:00:00Z INFO connected to Postgres
2026-01-01T00:00:01Z ERROR STREAMVAULT_DATABASE_URL is not set
";
    let err = parse_startup_error(content).expect("should find an error");
    assert!(err.contains("STREAMVAULT_DATABASE_URL is not set"));
}

#[test]
fn parse_startup_error_returns_none_without_marker() {
    let content = "no startup marker here at all\n";
    assert!(parse_startup_error(content).is_none());
}

#[test]
fn parse_startup_error_returns_none_when_clean() {
    let content = "\
--- streamvaultd: starting (pid: 456) ---
2026-01-01T00:00:00Z INFO connected to Postgres and ran migrations
2026-01-01T00:00:01Z INFO control socket listening
";
    assert!(parse_startup_error(content).is_none());
}

#[test]
fn parse_startup_error_uses_most_recent_marker() {
    let content = "\
--- streamvaultd: starting (pid: 1) ---
2026-01-01T00:00:00Z ERROR stale error from a previous run
--- streamvaultd: starting (pid: 2) ---
2026-01-01T00:00:01Z INFO clean restart
";
    assert!(parse_startup_error(content).is_none());
}

#[test]
#[serial]
fn read_daemon_pid_returns_none_without_pid_file() {
    let state_dir = tempdir().unwrap();
    std::env::set_var("STREAMVAULT_STATE_DIR", state_dir.path());

    assert_eq!(read_daemon_pid().unwrap(), None);
}

#[test]
#[serial]
fn read_daemon_pid_parses_existing_file() {
    let state_dir = tempdir().unwrap();
    std::env::set_var("STREAMVAULT_STATE_DIR", state_dir.path());

    std::fs::write(state_dir.path().join("daemon.pid"), "4242\n").unwrap();
    assert_eq!(read_daemon_pid().unwrap(), Some(4242));
}

#[test]
#[serial]
fn cleanup_stale_pid_removes_file() {
    let state_dir = tempdir().unwrap();
    let pid_path = state_dir.path().join("daemon.pid");
    std::fs::write(&pid_path, "1\n").unwrap();

    cleanup_stale_pid(state_dir.path());

    assert!(!pid_path.exists());
}

#[test]
fn process_exists_is_false_for_a_reaped_pid() {
    let mut child = std::process::Command::new("true").spawn().unwrap();
    let pid = child.id();
    child.wait().unwrap();

    assert!(!process_exists(pid));
}

#[test]
#[serial]
fn stop_daemon_sync_without_pid_file_is_a_noop() {
    let state_dir = tempdir().unwrap();
    std::env::set_var("STREAMVAULT_STATE_DIR", state_dir.path());

    assert!(!stop_daemon_sync(false));
}
