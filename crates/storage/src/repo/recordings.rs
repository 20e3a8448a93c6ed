// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository for [`Recording`].

use sqlx::Row;
use streamvault_core::{Recording, RecordingId, RecordingStatus, StreamId};

use crate::error::StorageError;
use crate::retry::with_retry;
use crate::Gateway;

fn status_to_str(status: RecordingStatus) -> &'static str {
    match status {
        RecordingStatus::Recording => "recording",
        RecordingStatus::Processing => "processing",
        RecordingStatus::Completed => "completed",
        RecordingStatus::Stopped => "stopped",
        RecordingStatus::Failed => "failed",
    }
}

fn status_from_str(s: &str) -> RecordingStatus {
    match s {
        "recording" => RecordingStatus::Recording,
        "processing" => RecordingStatus::Processing,
        "completed" => RecordingStatus::Completed,
        "stopped" => RecordingStatus::Stopped,
        _ => RecordingStatus::Failed,
    }
}

fn from_row(row: &sqlx::postgres::PgRow) -> Result<Recording, StorageError> {
    let status: String = row.try_get("status")?;
    Ok(Recording {
        id: RecordingId::new(row.try_get("id")?),
        stream_id: StreamId::new(row.try_get("stream_id")?),
        path: row.try_get("path")?,
        status: status_from_str(&status),
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        duration_seconds: row.try_get("duration_seconds")?,
        file_size_bytes: row.try_get("file_size_bytes")?,
        error_message: row.try_get("error_message")?,
        failure_reason: row.try_get("failure_reason")?,
        error_at: row.try_get("error_at")?,
    })
}

pub struct RecordingRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> RecordingRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn get(&self, id: RecordingId) -> Result<Recording, StorageError> {
        let row = sqlx::query("SELECT * FROM recordings WHERE id = $1")
            .bind(id.get())
            .fetch_optional(self.gateway.pool())
            .await?
            .ok_or(StorageError::NotFound)?;
        from_row(&row)
    }

    pub async fn insert(&self, recording: &Recording) -> Result<RecordingId, StorageError> {
        with_retry("recordings.insert", || async {
            let row = sqlx::query(
                r#"
                INSERT INTO recordings (stream_id, path, status, start_time, end_time,
                                        duration_seconds, file_size_bytes, error_message,
                                        failure_reason, error_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id
                "#,
            )
            .bind(recording.stream_id.get())
            .bind(&recording.path)
            .bind(status_to_str(recording.status))
            .bind(recording.start_time)
            .bind(recording.end_time)
            .bind(recording.duration_seconds)
            .bind(recording.file_size_bytes)
            .bind(&recording.error_message)
            .bind(&recording.failure_reason)
            .bind(recording.error_at)
            .fetch_one(self.gateway.pool())
            .await?;
            let id: i64 = row.try_get("id")?;
            Ok(RecordingId::new(id))
        })
        .await
    }

    pub async fn update_status(&self, recording: &Recording) -> Result<(), StorageError> {
        with_retry("recordings.update_status", || async {
            sqlx::query(
                r#"
                UPDATE recordings
                SET status = $1, end_time = $2, duration_seconds = $3, file_size_bytes = $4,
                    error_message = $5, failure_reason = $6, error_at = $7
                WHERE id = $8
                "#,
            )
            .bind(status_to_str(recording.status))
            .bind(recording.end_time)
            .bind(recording.duration_seconds)
            .bind(recording.file_size_bytes)
            .bind(&recording.error_message)
            .bind(&recording.failure_reason)
            .bind(recording.error_at)
            .bind(recording.id.get())
            .execute(self.gateway.pool())
            .await?;
            Ok(())
        })
        .await
    }

    /// Updates the current working-file path (§4.8: segment concatenation
    /// and MP4 remux each relocate the file without changing status).
    pub async fn update_path(&self, id: RecordingId, path: &str) -> Result<(), StorageError> {
        with_retry("recordings.update_path", || async {
            sqlx::query("UPDATE recordings SET path = $1 WHERE id = $2")
                .bind(path)
                .bind(id.get())
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    /// Recordings still in `Recording`/`Processing` with no terminal
    /// status, read back at boot by the recovery subsystem (C10).
    pub async fn list_non_terminal(&self) -> Result<Vec<Recording>, StorageError> {
        let rows = sqlx::query("SELECT * FROM recordings WHERE status IN ('recording', 'processing')")
            .fetch_all(self.gateway.pool())
            .await?;
        rows.iter().map(from_row).collect()
    }

    /// Recordings marked `completed`, read back at boot by the recovery
    /// subsystem (C10) to check I2 ("if a step is completed, its output
    /// file exists") before trusting the row.
    pub async fn list_completed(&self) -> Result<Vec<Recording>, StorageError> {
        let rows = sqlx::query("SELECT * FROM recordings WHERE status = 'completed'")
            .fetch_all(self.gateway.pool())
            .await?;
        rows.iter().map(from_row).collect()
    }

    /// Every current working-file path, used by the startup orphan scan
    /// (C10) to tell a TS file or segment directory with no matching row
    /// apart from one the DAG already knows about.
    pub async fn list_all_paths(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT path FROM recordings").fetch_all(self.gateway.pool()).await?;
        rows.iter().map(|r| Ok(r.try_get("path")?)).collect()
    }
}

#[cfg(test)]
#[path = "recordings_tests.rs"]
mod tests;
