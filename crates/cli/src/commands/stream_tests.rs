// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use clap::FromArgMatches;

#[test]
fn stream_tasks_parses_id() {
    let matches =
        crate::cli_command().try_get_matches_from(["streamvault", "stream", "tasks", "42"]).unwrap();
    let cli = crate::Cli::from_arg_matches(&matches).unwrap();
    match cli.command {
        Some(crate::Commands::Stream(args)) => {
            assert!(matches!(args.command, super::StreamCommand::Tasks { stream_id: 42 }));
        }
        _ => panic!("expected Stream command"),
    }
}

#[test]
fn stream_cancel_parses_id() {
    let matches =
        crate::cli_command().try_get_matches_from(["streamvault", "stream", "cancel", "7"]).unwrap();
    let cli = crate::Cli::from_arg_matches(&matches).unwrap();
    match cli.command {
        Some(crate::Commands::Stream(args)) => {
            assert!(matches!(args.command, super::StreamCommand::Cancel { stream_id: 7 }));
        }
        _ => panic!("expected Stream command"),
    }
}

#[test]
fn stream_tasks_rejects_non_numeric_id() {
    let result = crate::cli_command().try_get_matches_from(["streamvault", "stream", "tasks", "abc"]);
    assert!(result.is_err());
}
