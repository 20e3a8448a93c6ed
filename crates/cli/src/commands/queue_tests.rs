// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use clap::FromArgMatches;

#[test]
fn queue_stats_parses() {
    let matches = crate::cli_command().try_get_matches_from(["streamvault", "queue", "stats"]).unwrap();
    let cli = crate::Cli::from_arg_matches(&matches).unwrap();
    assert!(matches!(cli.command, Some(crate::Commands::Queue(ref args)) if matches!(args.command, super::QueueCommand::Stats)));
}

#[test]
fn queue_requires_subcommand() {
    let result = crate::cli_command().try_get_matches_from(["streamvault", "queue"]);
    assert!(result.is_err(), "queue with no subcommand should fail to parse");
}
