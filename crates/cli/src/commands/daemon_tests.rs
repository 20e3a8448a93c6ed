// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use clap::error::ErrorKind;
use clap::FromArgMatches;

// -- No subcommand (colored help) -------------------------------------------

#[test]
fn daemon_no_subcommand_parses() {
    let matches = crate::cli_command().try_get_matches_from(["streamvault", "daemon"]).unwrap();
    let cli = crate::Cli::from_arg_matches(&matches).unwrap();
    assert!(matches!(cli.command, Some(crate::Commands::Daemon(ref args)) if args.command.is_none()));
}

#[test]
fn daemon_stop_kill_flag_parses() {
    let matches = crate::cli_command()
        .try_get_matches_from(["streamvault", "daemon", "stop", "--kill"])
        .unwrap();
    let cli = crate::Cli::from_arg_matches(&matches).unwrap();
    match cli.command {
        Some(crate::Commands::Daemon(args)) => {
            assert!(matches!(args.command, Some(super::DaemonCommand::Stop { kill: true })));
        }
        _ => panic!("expected Daemon command"),
    }
}

// -- Help colorization ------------------------------------------------------

#[test]
fn daemon_help_is_colorized() {
    let cmd = crate::find_subcommand(crate::cli_command(), &["daemon"]);
    let help = crate::help::format_help(cmd);
    let colorized = crate::help::colorize_help(&help);
    assert!(
        colorized.contains("\x1b[38;5;74m"),
        "daemon help should contain header color codes when colorized, got:\n{colorized}"
    );
}

#[test]
fn daemon_help_request_produces_display_help() {
    let err = crate::cli_command().try_get_matches_from(["streamvault", "daemon", "-h"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
}

#[test]
fn daemon_subcommand_help_contains_expected_content() {
    let cmd = crate::find_subcommand(crate::cli_command(), &["daemon"]);
    let help = crate::help::format_help(cmd);
    assert!(help.contains("Usage:"), "daemon help should contain Usage line, got:\n{help}");
    assert!(help.contains("start"), "daemon help should mention start subcommand, got:\n{help}");
    assert!(help.contains("stop"), "daemon help should mention stop subcommand, got:\n{help}");
    assert!(help.contains("status"), "daemon help should mention status subcommand, got:\n{help}");
}
