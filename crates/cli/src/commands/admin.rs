// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `streamvault admin` - administrative maintenance

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Delete expired sessions and share tokens
    Cleanup,
}

pub async fn handle(command: AdminCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match command {
        AdminCommand::Cleanup => {
            let (sessions_deleted, tokens_deleted) = client.admin_cleanup().await?;
            match format {
                OutputFormat::Json => {
                    let obj = serde_json::json!({
                        "sessions_deleted": sessions_deleted,
                        "tokens_deleted": tokens_deleted,
                    });
                    println!("{}", serde_json::to_string_pretty(&obj)?);
                }
                OutputFormat::Text => {
                    println!(
                        "Deleted {} expired session(s) and {} expired share token(s)",
                        sessions_deleted, tokens_deleted
                    );
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
