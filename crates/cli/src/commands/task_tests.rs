// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use clap::FromArgMatches;

#[test]
fn task_show_parses_id() {
    let matches =
        crate::cli_command().try_get_matches_from(["streamvault", "task", "show", "abc-123"]).unwrap();
    let cli = crate::Cli::from_arg_matches(&matches).unwrap();
    match cli.command {
        Some(crate::Commands::Task(args)) => {
            assert!(matches!(args.command, super::TaskCommand::Show { id } if id == "abc-123"));
        }
        _ => panic!("expected Task command"),
    }
}

#[test]
fn task_stats_parses() {
    let matches = crate::cli_command().try_get_matches_from(["streamvault", "task", "stats"]).unwrap();
    let cli = crate::Cli::from_arg_matches(&matches).unwrap();
    assert!(matches!(cli.command, Some(crate::Commands::Task(ref args)) if matches!(args.command, super::TaskCommand::Stats)));
}

#[test]
fn task_requires_subcommand() {
    let result = crate::cli_command().try_get_matches_from(["streamvault", "task"]);
    assert!(result.is_err());
}
