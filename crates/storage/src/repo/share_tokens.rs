// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository for [`ShareToken`] (I6 / P5).

use sqlx::Row;
use streamvault_core::{ShareToken, StreamId};

use crate::error::StorageError;
use crate::retry::with_retry;
use crate::Gateway;

fn from_row(row: &sqlx::postgres::PgRow) -> Result<ShareToken, StorageError> {
    Ok(ShareToken {
        token: row.try_get("token")?,
        stream_id: StreamId::new(row.try_get("stream_id")?),
        expires_at: row.try_get("expires_at")?,
        created_at: row.try_get("created_at")?,
    })
}

pub struct ShareTokenRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> ShareTokenRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn get(&self, token: &str) -> Result<ShareToken, StorageError> {
        let row = sqlx::query("SELECT * FROM share_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(self.gateway.pool())
            .await?
            .ok_or(StorageError::NotFound)?;
        from_row(&row)
    }

    pub async fn insert(&self, token: &ShareToken) -> Result<(), StorageError> {
        with_retry("share_tokens.insert", || async {
            sqlx::query("INSERT INTO share_tokens (token, stream_id, expires_at, created_at) VALUES ($1, $2, $3, $4)")
                .bind(&token.token)
                .bind(token.stream_id.get())
                .bind(token.expires_at)
                .bind(token.created_at)
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    /// Swept by the C12 cleanup task alongside expired sessions.
    pub async fn delete_expired(&self, now: chrono::DateTime<chrono::Utc>) -> Result<u64, StorageError> {
        with_retry("share_tokens.delete_expired", || async {
            let result = sqlx::query("DELETE FROM share_tokens WHERE expires_at <= $1")
                .bind(now)
                .execute(self.gateway.pool())
                .await?;
            Ok(result.rows_affected())
        })
        .await
    }
}

#[cfg(test)]
#[path = "share_tokens_tests.rs"]
mod tests;
