// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository for [`AuthSession`] (C12).

use sqlx::Row;
use streamvault_core::AuthSession;

use crate::error::StorageError;
use crate::retry::with_retry;
use crate::Gateway;

fn from_row(row: &sqlx::postgres::PgRow) -> Result<AuthSession, StorageError> {
    Ok(AuthSession {
        token: row.try_get("token")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        last_seen_at: row.try_get("last_seen_at")?,
    })
}

pub struct SessionRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> SessionRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn get(&self, token: &str) -> Result<AuthSession, StorageError> {
        let row = sqlx::query("SELECT * FROM auth_sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(self.gateway.pool())
            .await?
            .ok_or(StorageError::NotFound)?;
        from_row(&row)
    }

    pub async fn insert(&self, session: &AuthSession) -> Result<(), StorageError> {
        with_retry("auth_sessions.insert", || async {
            sqlx::query("INSERT INTO auth_sessions (token, user_id, created_at, last_seen_at) VALUES ($1, $2, $3, $4)")
                .bind(&session.token)
                .bind(&session.user_id)
                .bind(session.created_at)
                .bind(session.last_seen_at)
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    pub async fn touch(&self, token: &str, at: chrono::DateTime<chrono::Utc>) -> Result<(), StorageError> {
        with_retry("auth_sessions.touch", || async {
            sqlx::query("UPDATE auth_sessions SET last_seen_at = $1 WHERE token = $2")
                .bind(at)
                .bind(token)
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    /// Sweep run by the C12 cleanup task: every session idle past the
    /// configured window is deleted outright, forcing re-authentication.
    pub async fn delete_idle(
        &self,
        now: chrono::DateTime<chrono::Utc>,
        idle_window: chrono::Duration,
    ) -> Result<u64, StorageError> {
        let cutoff = now - idle_window;
        with_retry("auth_sessions.delete_idle", || async {
            let result = sqlx::query("DELETE FROM auth_sessions WHERE last_seen_at <= $1")
                .bind(cutoff)
                .execute(self.gateway.pool())
                .await?;
            Ok(result.rows_affected())
        })
        .await
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
