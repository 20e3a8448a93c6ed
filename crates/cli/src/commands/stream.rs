// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `streamvault stream` - per-stream task control

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::output::OutputFormat;
use crate::table::{Column, Table};

#[derive(Args)]
pub struct StreamArgs {
    #[command(subcommand)]
    pub command: StreamCommand,
}

#[derive(Subcommand)]
pub enum StreamCommand {
    /// List tasks belonging to a stream
    Tasks {
        /// Stream ID
        stream_id: i64,
    },
    /// Cancel all pending/active tasks for a stream
    Cancel {
        /// Stream ID
        stream_id: i64,
    },
}

pub async fn handle(command: StreamCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match command {
        StreamCommand::Tasks { stream_id } => {
            let tasks = client.stream_tasks(stream_id.into()).await?;
            if tasks.is_empty() {
                println!("No tasks found for stream {}", stream_id);
                return Ok(());
            }
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
                OutputFormat::Text => {
                    let mut table = Table::new(vec![
                        Column::muted("ID"),
                        Column::left("TYPE"),
                        Column::status("STATE"),
                        Column::right("PROGRESS"),
                    ]);
                    for task in &tasks {
                        table.row(vec![
                            task.id.clone(),
                            task.task_type.clone(),
                            task.state.clone(),
                            format!("{}%", task.progress),
                        ]);
                    }
                    table.render(&mut std::io::stdout());
                }
            }
        }
        StreamCommand::Cancel { stream_id } => {
            let cancelled = client.cancel_stream(stream_id.into()).await?;
            match format {
                OutputFormat::Json => {
                    let obj = serde_json::json!({ "cancelled": cancelled });
                    println!("{}", serde_json::to_string_pretty(&obj)?);
                }
                OutputFormat::Text => {
                    println!("Cancelled {} task(s) for stream {}", cancelled, stream_id);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
