// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session & Share-Token Cleanup (C12, §4.11): two idempotent, safe-to-
//! run-concurrently sweeps. Session cleanup deletes rows idle past a
//! configurable window (default 24h); share-token cleanup deletes
//! expired tokens (I6 / P5) and is additionally triggered lazily on
//! every token validation by the caller (out of scope here — the gate
//! itself lives on [`streamvault_core::ShareToken::is_valid`]).

use chrono::Duration;
use streamvault_storage::{Gateway, SessionRepo, ShareTokenRepo};
use tracing::info;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy)]
pub struct CleanupConfig {
    /// Default 24h (§3, §4.11).
    pub session_idle_window: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            session_idle_window: Duration::hours(24),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupReport {
    pub sessions_deleted: u64,
    pub tokens_deleted: u64,
}

/// Runs both sweeps once. Called on a periodic timer (session cleanup
/// default every 60 minutes per §4.11) and ad hoc from the operator CLI.
pub async fn run_cleanup_sweep(
    gateway: &Gateway,
    config: CleanupConfig,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<CleanupReport, EngineError> {
    let sessions_deleted = SessionRepo::new(gateway).delete_idle(now, config.session_idle_window).await?;
    let tokens_deleted = ShareTokenRepo::new(gateway).delete_expired(now).await?;
    if sessions_deleted > 0 || tokens_deleted > 0 {
        info!(sessions_deleted, tokens_deleted, "cleanup sweep removed stale rows");
    }
    Ok(CleanupReport {
        sessions_deleted,
        tokens_deleted,
    })
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
