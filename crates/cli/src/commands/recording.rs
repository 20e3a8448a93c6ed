// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `streamvault recording` - post-processing control

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct RecordingArgs {
    #[command(subcommand)]
    pub command: RecordingCommand,
}

#[derive(Subcommand)]
pub enum RecordingCommand {
    /// (Re-)enqueue the post-processing DAG for a recording
    EnqueuePostProcessing {
        /// Recording ID
        recording_id: i64,
    },
}

pub async fn handle(command: RecordingCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match command {
        RecordingCommand::EnqueuePostProcessing { recording_id } => {
            let task_ids = client.enqueue_post_processing(recording_id.into()).await?;
            match format {
                OutputFormat::Json => {
                    let obj = serde_json::json!({ "task_ids": task_ids.iter().map(|t| t.as_str()).collect::<Vec<_>>() });
                    println!("{}", serde_json::to_string_pretty(&obj)?);
                }
                OutputFormat::Text => {
                    if task_ids.is_empty() {
                        println!("No tasks enqueued for recording {} (already processed)", recording_id);
                    } else {
                        println!("Enqueued {} task(s) for recording {}:", task_ids.len(), recording_id);
                        for id in &task_ids {
                            println!("  {}", id.short(8));
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "recording_tests.rs"]
mod tests;
