// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository for [`RecordingProcessingState`]: the idempotency gate
//! each post-processing handler reads before doing any work (§4.9).

use sqlx::Row;
use streamvault_core::{ProcessingStepStatus, RecordingId, RecordingProcessingState, StepName};

use crate::error::StorageError;
use crate::retry::with_retry;
use crate::Gateway;

fn step_to_str(step: StepName) -> &'static str {
    match step {
        StepName::Metadata => "metadata",
        StepName::Chapters => "chapters",
        StepName::Mp4Remux => "mp4_remux",
        StepName::Mp4Validation => "mp4_validation",
        StepName::Thumbnail => "thumbnail",
        StepName::Cleanup => "cleanup",
    }
}

fn step_from_str(s: &str) -> Option<StepName> {
    Some(match s {
        "metadata" => StepName::Metadata,
        "chapters" => StepName::Chapters,
        "mp4_remux" => StepName::Mp4Remux,
        "mp4_validation" => StepName::Mp4Validation,
        "thumbnail" => StepName::Thumbnail,
        "cleanup" => StepName::Cleanup,
        _ => return None,
    })
}

fn status_to_str(status: ProcessingStepStatus) -> &'static str {
    match status {
        ProcessingStepStatus::Pending => "pending",
        ProcessingStepStatus::Running => "running",
        ProcessingStepStatus::Completed => "completed",
        ProcessingStepStatus::Failed => "failed",
        ProcessingStepStatus::Skipped => "skipped",
    }
}

fn status_from_str(s: &str) -> ProcessingStepStatus {
    match s {
        "running" => ProcessingStepStatus::Running,
        "completed" => ProcessingStepStatus::Completed,
        "failed" => ProcessingStepStatus::Failed,
        "skipped" => ProcessingStepStatus::Skipped,
        _ => ProcessingStepStatus::Pending,
    }
}

fn from_row(row: &sqlx::postgres::PgRow) -> Result<RecordingProcessingState, StorageError> {
    let step: String = row.try_get("step")?;
    let status: String = row.try_get("status")?;
    Ok(RecordingProcessingState {
        recording_id: RecordingId::new(row.try_get("recording_id")?),
        step: step_from_str(&step).ok_or(StorageError::NotFound)?,
        status: status_from_str(&status),
        attempts: row.try_get::<i32, _>("attempts")? as u32,
        last_error: row.try_get("last_error")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub struct ProcessingStateRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> ProcessingStateRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Re-read before running a step. Returns `None` if the row hasn't
    /// been created yet (first attempt).
    pub async fn get(
        &self,
        recording_id: RecordingId,
        step: StepName,
    ) -> Result<Option<RecordingProcessingState>, StorageError> {
        let row = sqlx::query("SELECT * FROM recording_processing_state WHERE recording_id = $1 AND step = $2")
            .bind(recording_id.get())
            .bind(step_to_str(step))
            .fetch_optional(self.gateway.pool())
            .await?;
        row.as_ref().map(from_row).transpose()
    }

    pub async fn upsert(&self, state: &RecordingProcessingState) -> Result<(), StorageError> {
        with_retry("processing_state.upsert", || async {
            sqlx::query(
                r#"
                INSERT INTO recording_processing_state (recording_id, step, status, attempts, last_error, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (recording_id, step) DO UPDATE SET
                    status = EXCLUDED.status,
                    attempts = EXCLUDED.attempts,
                    last_error = EXCLUDED.last_error,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(state.recording_id.get())
            .bind(step_to_str(state.step))
            .bind(status_to_str(state.status))
            .bind(state.attempts as i32)
            .bind(&state.last_error)
            .bind(state.updated_at)
            .execute(self.gateway.pool())
            .await?;
            Ok(())
        })
        .await
    }

    pub async fn list_for_recording(
        &self,
        recording_id: RecordingId,
    ) -> Result<Vec<RecordingProcessingState>, StorageError> {
        let rows = sqlx::query("SELECT * FROM recording_processing_state WHERE recording_id = $1")
            .bind(recording_id.get())
            .fetch_all(self.gateway.pool())
            .await?;
        rows.iter().map(from_row).collect()
    }
}

#[cfg(test)]
#[path = "processing_state_tests.rs"]
mod tests;
