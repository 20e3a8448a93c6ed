// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository for [`Stream`].

use sqlx::Row;
use streamvault_core::{Stream, StreamId, StreamerId};

use crate::error::StorageError;
use crate::retry::with_retry;
use crate::Gateway;

fn from_row(row: &sqlx::postgres::PgRow) -> Result<Stream, StorageError> {
    Ok(Stream {
        id: StreamId::new(row.try_get("id")?),
        streamer_id: StreamerId::new(row.try_get("streamer_id")?),
        external_stream_id: row.try_get("external_stream_id")?,
        title: row.try_get("title")?,
        category_name: row.try_get("category_name")?,
        language: row.try_get("language")?,
        started_at: row.try_get("started_at")?,
        ended_at: row.try_get("ended_at")?,
        episode_number: row.try_get("episode_number")?,
        recording_path: row.try_get("recording_path")?,
    })
}

pub struct StreamRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> StreamRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn get(&self, id: StreamId) -> Result<Stream, StorageError> {
        let row = sqlx::query("SELECT * FROM streams WHERE id = $1")
            .bind(id.get())
            .fetch_optional(self.gateway.pool())
            .await?
            .ok_or(StorageError::NotFound)?;
        from_row(&row)
    }

    pub async fn insert(&self, stream: &Stream) -> Result<StreamId, StorageError> {
        with_retry("streams.insert", || async {
            let row = sqlx::query(
                r#"
                INSERT INTO streams (streamer_id, external_stream_id, title, category_name,
                                     language, started_at, ended_at, episode_number, recording_path)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING id
                "#,
            )
            .bind(stream.streamer_id.get())
            .bind(&stream.external_stream_id)
            .bind(&stream.title)
            .bind(&stream.category_name)
            .bind(&stream.language)
            .bind(stream.started_at)
            .bind(stream.ended_at)
            .bind(stream.episode_number)
            .bind(&stream.recording_path)
            .fetch_one(self.gateway.pool())
            .await?;
            let id: i64 = row.try_get("id")?;
            Ok(StreamId::new(id))
        })
        .await
    }

    /// The highest `episode_number` already issued to `streamer_id` within
    /// the calendar month containing `now` (§4.7, §9 Open Question:
    /// episode numbering resets on calendar-month rollover).
    pub async fn max_episode_number_this_month(
        &self,
        streamer_id: StreamerId,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<i32>, StorageError> {
        let month_start = now
            .date_naive()
            .with_day(1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .ok_or(StorageError::NotFound)?;

        let row = sqlx::query(
            "SELECT MAX(episode_number) AS max_ep FROM streams WHERE streamer_id = $1 AND started_at >= $2",
        )
        .bind(streamer_id.get())
        .bind(month_start)
        .fetch_one(self.gateway.pool())
        .await?;
        Ok(row.try_get("max_ep")?)
    }

    pub async fn mark_ended(
        &self,
        id: StreamId,
        ended_at: chrono::DateTime<chrono::Utc>,
        recording_path: Option<&str>,
    ) -> Result<(), StorageError> {
        with_retry("streams.mark_ended", || async {
            sqlx::query("UPDATE streams SET ended_at = $1, recording_path = $2 WHERE id = $3")
                .bind(ended_at)
                .bind(recording_path)
                .bind(id.get())
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    /// Persists the episode number assigned at recording start (§4.7).
    pub async fn set_episode_number(&self, id: StreamId, episode_number: i32) -> Result<(), StorageError> {
        with_retry("streams.set_episode_number", || async {
            sqlx::query("UPDATE streams SET episode_number = $1 WHERE id = $2")
                .bind(episode_number)
                .bind(id.get())
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    /// The streamer's current live stream, if any (`ended_at IS NULL`),
    /// most recent first. Used by `force_start_recording` (§9 supplement)
    /// when no poll-discovered `Stream` row exists yet.
    pub async fn find_live(&self, streamer_id: StreamerId) -> Result<Option<Stream>, StorageError> {
        let row = sqlx::query(
            "SELECT * FROM streams WHERE streamer_id = $1 AND ended_at IS NULL ORDER BY started_at DESC LIMIT 1",
        )
        .bind(streamer_id.get())
        .fetch_optional(self.gateway.pool())
        .await?;
        row.as_ref().map(from_row).transpose()
    }
}

use chrono::Datelike;

#[cfg(test)]
#[path = "streams_tests.rs"]
mod tests;
