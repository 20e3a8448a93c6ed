// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `streamvault queue` - per-streamer queue stats

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::output::OutputFormat;
use crate::table::{Column, Table};

#[derive(Args)]
pub struct QueueArgs {
    #[command(subcommand)]
    pub command: QueueCommand,
}

#[derive(Subcommand)]
pub enum QueueCommand {
    /// Show pending task counts per streamer queue
    Stats,
}

pub async fn handle(command: QueueCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match command {
        QueueCommand::Stats => {
            let stats = client.queue_stats().await?;

            if stats.is_empty() {
                println!("No active streamer queues");
                return Ok(());
            }

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                OutputFormat::Text => {
                    let mut table = Table::new(vec![Column::left("STREAM"), Column::right("PENDING")]);
                    for entry in &stats {
                        table.row(vec![entry.stream_id.to_string(), entry.pending.to_string()]);
                    }
                    table.render(&mut std::io::stdout());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
