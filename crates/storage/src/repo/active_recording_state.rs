// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository for [`ActiveRecordingState`], keyed one row per live
//! `stream_id`. Read by the reaper sweep (C10) and the capture monitor.

use sqlx::Row;
use streamvault_core::{ActiveRecordingState, ActiveRecordingStatus, RecordingId, StreamId};

use crate::error::StorageError;
use crate::retry::with_retry;
use crate::Gateway;

fn status_to_str(status: ActiveRecordingStatus) -> &'static str {
    match status {
        ActiveRecordingStatus::Active => "active",
        ActiveRecordingStatus::Error => "error",
    }
}

fn status_from_str(s: &str) -> ActiveRecordingStatus {
    match s {
        "error" => ActiveRecordingStatus::Error,
        _ => ActiveRecordingStatus::Active,
    }
}

fn from_row(row: &sqlx::postgres::PgRow) -> Result<ActiveRecordingState, StorageError> {
    let status: String = row.try_get("status")?;
    Ok(ActiveRecordingState {
        stream_id: StreamId::new(row.try_get("stream_id")?),
        recording_id: RecordingId::new(row.try_get("recording_id")?),
        os_pid: row.try_get::<i64, _>("os_pid")? as u32,
        process_identifier: row.try_get("process_identifier")?,
        streamer_name: row.try_get("streamer_name")?,
        started_at: row.try_get("started_at")?,
        ts_output_path: row.try_get("ts_output_path")?,
        forced: row.try_get("forced")?,
        quality: row.try_get("quality")?,
        status: status_from_str(&status),
        last_heartbeat: row.try_get("last_heartbeat")?,
        config: row.try_get("config")?,
    })
}

pub struct ActiveRecordingRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> ActiveRecordingRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn upsert(&self, state: &ActiveRecordingState) -> Result<(), StorageError> {
        with_retry("active_recording_state.upsert", || async {
            sqlx::query(
                r#"
                INSERT INTO active_recording_state (stream_id, recording_id, os_pid, process_identifier,
                                                     streamer_name, started_at, ts_output_path, forced,
                                                     quality, status, last_heartbeat, config)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (stream_id) DO UPDATE SET
                    recording_id = EXCLUDED.recording_id,
                    os_pid = EXCLUDED.os_pid,
                    process_identifier = EXCLUDED.process_identifier,
                    status = EXCLUDED.status,
                    last_heartbeat = EXCLUDED.last_heartbeat,
                    config = EXCLUDED.config
                "#,
            )
            .bind(state.stream_id.get())
            .bind(state.recording_id.get())
            .bind(state.os_pid as i64)
            .bind(&state.process_identifier)
            .bind(&state.streamer_name)
            .bind(state.started_at)
            .bind(&state.ts_output_path)
            .bind(state.forced)
            .bind(&state.quality)
            .bind(status_to_str(state.status))
            .bind(state.last_heartbeat)
            .bind(&state.config)
            .execute(self.gateway.pool())
            .await?;
            Ok(())
        })
        .await
    }

    pub async fn touch_heartbeat(
        &self,
        stream_id: StreamId,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), StorageError> {
        with_retry("active_recording_state.touch_heartbeat", || async {
            sqlx::query("UPDATE active_recording_state SET last_heartbeat = $1 WHERE stream_id = $2")
                .bind(at)
                .bind(stream_id.get())
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    pub async fn get(&self, stream_id: StreamId) -> Result<Option<ActiveRecordingState>, StorageError> {
        let row = sqlx::query("SELECT * FROM active_recording_state WHERE stream_id = $1")
            .bind(stream_id.get())
            .fetch_optional(self.gateway.pool())
            .await?;
        row.as_ref().map(from_row).transpose()
    }

    pub async fn remove(&self, stream_id: StreamId) -> Result<(), StorageError> {
        with_retry("active_recording_state.remove", || async {
            sqlx::query("DELETE FROM active_recording_state WHERE stream_id = $1")
                .bind(stream_id.get())
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    /// All active rows, scanned by the 30-second reaper sweep (C10) to
    /// find heartbeats past their grace period.
    pub async fn list_all(&self) -> Result<Vec<ActiveRecordingState>, StorageError> {
        let rows = sqlx::query("SELECT * FROM active_recording_state")
            .fetch_all(self.gateway.pool())
            .await?;
        rows.iter().map(from_row).collect()
    }
}

#[cfg(test)]
#[path = "active_recording_state_tests.rs"]
mod tests;
