// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! streamvault - control client for the stream auto-recorder daemon

mod client;
mod client_lifecycle;
mod color;
mod commands;
mod daemon_process;
mod env;
mod exit_error;
mod help;
mod output;
mod table;

use output::OutputFormat;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{admin, daemon, queue, recording, stream, task};

use crate::client::DaemonClient;

#[derive(Parser)]
#[command(
    name = "streamvault",
    version,
    disable_version_flag = true,
    about = "StreamVault - automated Twitch recording and post-processing"
)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Daemon management
    Daemon(daemon::DaemonArgs),
    /// Task inspection
    Task(task::TaskArgs),
    /// Per-stream task control
    Stream(stream::StreamArgs),
    /// Recording management
    Recording(recording::RecordingArgs),
    /// Per-streamer queue stats
    Queue(queue::QueueArgs),
    /// Administrative maintenance
    Admin(admin::AdminArgs),
    /// Force-start a recording for a streamer (ignores the live poller)
    ForceStart {
        /// Streamer ID
        streamer_id: i64,
        /// Stream title
        title: String,
        /// Category name (e.g. "Just Chatting")
        #[arg(long)]
        category: Option<String>,
        /// Stream language code (e.g. "en")
        #[arg(long)]
        language: Option<String>,
        /// External (platform-native) stream ID
        #[arg(long)]
        external_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e.downcast_ref::<exit_error::ExitError>().map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err.chain().skip(1).all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

fn cli_command() -> clap::Command {
    Cli::command()
        .help_template(help::template())
        .before_help(help::commands())
        .after_help(help::after_help())
        .styles(help::styles())
        .arg(
            clap::Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .action(clap::ArgAction::Version)
                .help("Print version"),
        )
}

async fn run() -> Result<()> {
    let matches = match cli_command().try_get_matches() {
        Ok(m) => m,
        Err(e) => {
            if e.kind() == clap::error::ErrorKind::DisplayHelp {
                let args: Vec<String> = std::env::args().collect();
                print_formatted_help(&args);
                return Ok(());
            }
            e.exit();
        }
    };
    let cli = Cli::from_arg_matches(&matches)?;
    let format = cli.output;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            help::print_help(cli_command());
            return Ok(());
        }
    };

    // Daemon lifecycle commands manage the client connection themselves.
    if let Commands::Daemon(args) = command {
        return daemon::daemon(args, format).await;
    }

    match command {
        Commands::Task(args) => {
            let client = DaemonClient::for_query()?;
            task::handle(args.command, &client, format).await?
        }
        Commands::Stream(args) => {
            use stream::StreamCommand;
            match &args.command {
                StreamCommand::Cancel { .. } => {
                    let client = DaemonClient::for_action()?;
                    stream::handle(args.command, &client, format).await?
                }
                StreamCommand::Tasks { .. } => {
                    let client = DaemonClient::for_query()?;
                    stream::handle(args.command, &client, format).await?
                }
            }
        }
        Commands::Recording(args) => {
            let client = DaemonClient::for_action()?;
            recording::handle(args.command, &client, format).await?
        }
        Commands::Queue(args) => {
            let client = DaemonClient::for_query()?;
            queue::handle(args.command, &client, format).await?
        }
        Commands::Admin(args) => {
            let client = DaemonClient::for_action()?;
            admin::handle(args.command, &client, format).await?
        }
        Commands::ForceStart {
            streamer_id,
            title,
            category,
            language,
            external_id,
        } => {
            let client = DaemonClient::for_action()?;
            let recording_id = client
                .force_start(streamer_id.into(), title, category, language, external_id)
                .await?;
            match format {
                OutputFormat::Text => println!("Started recording #{}", recording_id),
                OutputFormat::Json => {
                    let obj = serde_json::json!({ "recording_id": recording_id });
                    println!("{}", serde_json::to_string_pretty(&obj)?);
                }
            }
        }
        Commands::Daemon(_) => unreachable!(),
    }

    Ok(())
}

/// Print help with post-hoc colorization, resolving the correct subcommand from args.
fn print_formatted_help(args: &[String]) {
    let cmd = cli_command();

    let non_flags: Vec<&String> = args.iter().skip(1).filter(|arg| !arg.starts_with('-')).collect();

    let subcommand_names: Vec<&str> = if non_flags.first().map(|s| s.as_str()) == Some("help") {
        non_flags.iter().skip(1).map(|s| s.as_str()).collect()
    } else {
        non_flags.iter().map(|s| s.as_str()).collect()
    };

    let target_cmd = find_subcommand(cmd, &subcommand_names);
    help::print_help(target_cmd);
}

/// Recursively find a nested subcommand by name path.
pub(crate) fn find_subcommand(mut cmd: clap::Command, names: &[&str]) -> clap::Command {
    for name in names {
        let mut found_sub = None;
        for sub in cmd.get_subcommands() {
            if sub.get_name() == *name || sub.get_all_aliases().any(|a| a == *name) {
                found_sub = Some(sub.get_name().to_string());
                break;
            }
        }
        if let Some(sub_name) = found_sub {
            if let Some(sub) = cmd.find_subcommand_mut(&sub_name) {
                cmd = sub.clone();
            } else {
                break;
            }
        } else {
            break;
        }
    }
    cmd
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
