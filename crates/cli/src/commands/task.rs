// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `streamvault task` - task queue inspection

use anyhow::Result;
use clap::{Args, Subcommand};

use streamvault_core::TaskId;
use streamvault_daemon::TrackedTaskEntry;

use crate::client::DaemonClient;
use crate::output::OutputFormat;
use crate::table::{Column, Table};

#[derive(Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Show aggregate task counts
    Stats,
    /// List currently active tasks
    Active,
    /// List recently completed tasks
    Recent,
    /// Show a single task by ID
    Show {
        /// Task ID (UUID)
        id: String,
    },
}

pub async fn handle(command: TaskCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match command {
        TaskCommand::Stats => {
            let stats = client.task_stats().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Text => {
                    println!("Active:    {}", stats.active);
                    println!("Completed: {}", stats.completed);
                    println!("External:  {}", stats.external);
                }
            }
        }
        TaskCommand::Active => {
            let tasks = client.active_tasks().await?;
            render_tasks(&tasks, format)?;
        }
        TaskCommand::Recent => {
            let tasks = client.recent_tasks().await?;
            render_tasks(&tasks, format)?;
        }
        TaskCommand::Show { id } => {
            let task = client.task_by_id(TaskId::new(id.clone())).await?;
            match task {
                Some(task) => render_tasks(&[task], format)?,
                None => anyhow::bail!("no task found with id {}", id),
            }
        }
    }
    Ok(())
}

fn render_tasks(tasks: &[TrackedTaskEntry], format: OutputFormat) -> Result<()> {
    if tasks.is_empty() {
        println!("No tasks found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        OutputFormat::Text => {
            let mut table = Table::new(vec![
                Column::muted("ID"),
                Column::left("TYPE"),
                Column::status("STATE"),
                Column::right("PROGRESS"),
                Column::right("RETRIES"),
                Column::left("EXTERNAL"),
                Column::left("ERROR"),
            ]);
            for task in tasks {
                table.row(vec![
                    task.id.clone(),
                    task.task_type.clone(),
                    task.state.clone(),
                    format!("{}%", task.progress),
                    task.retry_count.to_string(),
                    task.external.to_string(),
                    task.error_message.clone().unwrap_or_else(|| "-".to_string()),
                ]);
            }
            table.render(&mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
