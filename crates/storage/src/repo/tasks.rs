// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repositories for [`QueueTask`] (C7) and [`DependencyTask`] (C6).

use sqlx::Row;
use streamvault_core::{
    DependencyStatus, DependencyTask, Payload, Priority, QueueTask, QueueTaskStatus, StreamId, TaskId,
};

use crate::error::StorageError;
use crate::retry::with_retry;
use crate::Gateway;

fn priority_to_str(p: Priority) -> &'static str {
    match p {
        Priority::Low => "low",
        Priority::Normal => "normal",
        Priority::High => "high",
        Priority::Critical => "critical",
    }
}

fn priority_from_str(s: &str) -> Priority {
    match s {
        "low" => Priority::Low,
        "high" => Priority::High,
        "critical" => Priority::Critical,
        _ => Priority::Normal,
    }
}

fn queue_status_to_str(s: QueueTaskStatus) -> &'static str {
    match s {
        QueueTaskStatus::Pending => "pending",
        QueueTaskStatus::Running => "running",
        QueueTaskStatus::Completed => "completed",
        QueueTaskStatus::Failed => "failed",
        QueueTaskStatus::Retrying => "retrying",
    }
}

fn queue_status_from_str(s: &str) -> QueueTaskStatus {
    match s {
        "running" => QueueTaskStatus::Running,
        "completed" => QueueTaskStatus::Completed,
        "failed" => QueueTaskStatus::Failed,
        "retrying" => QueueTaskStatus::Retrying,
        _ => QueueTaskStatus::Pending,
    }
}

fn dep_status_to_str(s: DependencyStatus) -> &'static str {
    match s {
        DependencyStatus::Pending => "pending",
        DependencyStatus::Ready => "ready",
        DependencyStatus::Running => "running",
        DependencyStatus::Completed => "completed",
        DependencyStatus::Failed => "failed",
        DependencyStatus::Cancelled => "cancelled",
    }
}

fn dep_status_from_str(s: &str) -> DependencyStatus {
    match s {
        "ready" => DependencyStatus::Ready,
        "running" => DependencyStatus::Running,
        "completed" => DependencyStatus::Completed,
        "failed" => DependencyStatus::Failed,
        "cancelled" => DependencyStatus::Cancelled,
        _ => DependencyStatus::Pending,
    }
}

fn queue_task_from_row(row: &sqlx::postgres::PgRow) -> Result<QueueTask, StorageError> {
    let status: String = row.try_get("status")?;
    let priority: String = row.try_get("priority")?;
    let payload: serde_json::Value = row.try_get("payload")?;
    Ok(QueueTask {
        id: TaskId::new(row.try_get::<String, _>("id")?),
        payload: serde_json::from_value(payload).map_err(|e| StorageError::Constraint(e.to_string()))?,
        priority: priority_from_str(&priority),
        status: queue_status_from_str(&status),
        attempts: row.try_get::<i32, _>("attempts")? as u32,
        max_attempts: row.try_get::<i32, _>("max_attempts")? as u32,
        created_at: row.try_get("created_at")?,
        last_error: row.try_get("last_error")?,
    })
}

pub struct QueueTaskRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> QueueTaskRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// `queue_key` identifies the per-streamer queue this task belongs to
    /// (C7, I4). It's taken as an explicit argument rather than derived
    /// from `task.payload` alone: maintenance payloads carry their own
    /// `stream_id`, but the post-processing payloads only carry a
    /// `recording_id`, so the caller resolves the owning stream first.
    pub async fn enqueue(&self, task: &QueueTask, queue_key: StreamId) -> Result<(), StorageError> {
        let payload = serde_json::to_value(&task.payload).map_err(|e| StorageError::Constraint(e.to_string()))?;
        with_retry("queue_tasks.enqueue", || async {
            sqlx::query(
                r#"
                INSERT INTO queue_tasks (id, payload, priority, status, attempts, max_attempts,
                                         created_at, last_error, queue_key)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(task.id.as_str())
            .bind(&payload)
            .bind(priority_to_str(task.priority))
            .bind(queue_status_to_str(task.status))
            .bind(task.attempts as i32)
            .bind(task.max_attempts as i32)
            .bind(task.created_at)
            .bind(&task.last_error)
            .bind(queue_key.get())
            .execute(self.gateway.pool())
            .await?;
            Ok(())
        })
        .await
    }

    /// Highest-priority, oldest-first pending task for a given streamer
    /// queue (C7: one priority queue per streamer, FIFO within a tier).
    pub async fn next_pending(&self, queue_key: StreamId) -> Result<Option<QueueTask>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT * FROM queue_tasks
            WHERE status = 'pending' AND queue_key = $1
            ORDER BY
                CASE priority
                    WHEN 'critical' THEN 0
                    WHEN 'high' THEN 1
                    WHEN 'normal' THEN 2
                    ELSE 3
                END,
                created_at ASC
            LIMIT 1
            "#,
        )
        .bind(queue_key.get())
        .fetch_optional(self.gateway.pool())
        .await?;
        row.as_ref().map(queue_task_from_row).transpose()
    }

    pub async fn update_status(&self, task: &QueueTask) -> Result<(), StorageError> {
        with_retry("queue_tasks.update_status", || async {
            sqlx::query("UPDATE queue_tasks SET status = $1, attempts = $2, last_error = $3 WHERE id = $4")
                .bind(queue_status_to_str(task.status))
                .bind(task.attempts as i32)
                .bind(&task.last_error)
                .bind(task.id.as_str())
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    /// Atomically claims the next pending task for `queue_key` (C7: M
    /// workers share one streamer queue, so claiming must be
    /// `SELECT ... FOR UPDATE SKIP LOCKED` rather than the plain read
    /// [`Self::next_pending`] does).
    pub async fn claim_next(&self, queue_key: StreamId) -> Result<Option<QueueTask>, StorageError> {
        with_retry("queue_tasks.claim_next", || async {
            let row = sqlx::query(
                r#"
                UPDATE queue_tasks
                SET status = 'running'
                WHERE id = (
                    SELECT id FROM queue_tasks
                    WHERE status = 'pending' AND queue_key = $1
                    ORDER BY
                        CASE priority
                            WHEN 'critical' THEN 0
                            WHEN 'high' THEN 1
                            WHEN 'normal' THEN 2
                            ELSE 3
                        END,
                        created_at ASC
                    FOR UPDATE SKIP LOCKED
                    LIMIT 1
                )
                RETURNING *
                "#,
            )
            .bind(queue_key.get())
            .fetch_optional(self.gateway.pool())
            .await?;
            row.as_ref().map(queue_task_from_row).transpose()
        })
        .await
    }

    /// Single lookup by id, used by the reaper sweep (C10) to cancel a
    /// stuck maintenance task it only knows about via the progress tracker.
    pub async fn get(&self, id: &TaskId) -> Result<Option<QueueTask>, StorageError> {
        let row = sqlx::query("SELECT * FROM queue_tasks WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(self.gateway.pool())
            .await?;
        row.as_ref().map(queue_task_from_row).transpose()
    }

    /// Tasks not yet in a terminal state for `queue_key` (§4.10 stats
    /// snapshot).
    pub async fn count_pending(&self, queue_key: StreamId) -> Result<i64, StorageError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM queue_tasks WHERE queue_key = $1 AND status IN ('pending', 'running', 'retrying')",
        )
        .bind(queue_key.get())
        .fetch_one(self.gateway.pool())
        .await?;
        Ok(row.try_get("n")?)
    }

    /// Non-terminal tasks of a given payload `task_type` across every
    /// streamer queue, read by the reaper (C10) to enforce the
    /// in-flight cap on noisy maintenance classes (§4.6: "no more than 3
    /// orphan-recovery-check tasks in flight", P10).
    pub async fn count_in_flight(&self, task_type: &str) -> Result<i64, StorageError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM queue_tasks WHERE payload->>'task_type' = $1 AND status IN ('pending', 'running', 'retrying')",
        )
        .bind(task_type)
        .fetch_one(self.gateway.pool())
        .await?;
        Ok(row.try_get("n")?)
    }

    /// Every task tracked for `queue_key`, any status, oldest first — the
    /// per-stream task listing the operator control socket serves (§6).
    pub async fn list_by_queue_key(&self, queue_key: StreamId) -> Result<Vec<QueueTask>, StorageError> {
        let rows = sqlx::query("SELECT * FROM queue_tasks WHERE queue_key = $1 ORDER BY created_at ASC")
            .bind(queue_key.get())
            .fetch_all(self.gateway.pool())
            .await?;
        rows.iter().map(queue_task_from_row).collect()
    }

    /// Non-terminal tasks of `task_type` created before `older_than`,
    /// read by the reaper's age-based rules (§4.9: stuck-task reaping,
    /// the 2-minute orphan-check self-cancel).
    pub async fn list_stale(
        &self,
        task_type: &str,
        older_than: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<QueueTask>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM queue_tasks WHERE payload->>'task_type' = $1 AND status IN ('pending', 'running', 'retrying') AND created_at < $2",
        )
        .bind(task_type)
        .bind(older_than)
        .fetch_all(self.gateway.pool())
        .await?;
        rows.iter().map(queue_task_from_row).collect()
    }
}

fn dependency_task_from_row(row: &sqlx::postgres::PgRow) -> Result<DependencyTask, StorageError> {
    let status: String = row.try_get("status")?;
    let payload: serde_json::Value = row.try_get("payload")?;
    let depends_on: serde_json::Value = row.try_get("depends_on")?;
    let depends_on: Vec<String> =
        serde_json::from_value(depends_on).map_err(|e| StorageError::Constraint(e.to_string()))?;
    Ok(DependencyTask {
        id: TaskId::new(row.try_get::<String, _>("id")?),
        payload: serde_json::from_value(payload).map_err(|e| StorageError::Constraint(e.to_string()))?,
        depends_on: depends_on.into_iter().map(TaskId::new).collect(),
        status: dep_status_from_str(&status),
        created_at: row.try_get("created_at")?,
    })
}

pub struct DependencyTaskRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> DependencyTaskRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn insert(&self, task: &DependencyTask) -> Result<(), StorageError> {
        let payload = serde_json::to_value(&task.payload).map_err(|e| StorageError::Constraint(e.to_string()))?;
        let depends_on: Vec<&str> = task.depends_on.iter().map(|d| d.as_str()).collect();
        let depends_on = serde_json::to_value(&depends_on).map_err(|e| StorageError::Constraint(e.to_string()))?;
        with_retry("dependency_tasks.insert", || async {
            sqlx::query(
                r#"
                INSERT INTO dependency_tasks (id, payload, depends_on, status, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(task.id.as_str())
            .bind(&payload)
            .bind(&depends_on)
            .bind(dep_status_to_str(task.status))
            .bind(task.created_at)
            .execute(self.gateway.pool())
            .await?;
            Ok(())
        })
        .await
    }

    pub async fn update_status(&self, id: &TaskId, status: DependencyStatus) -> Result<(), StorageError> {
        with_retry("dependency_tasks.update_status", || async {
            sqlx::query("UPDATE dependency_tasks SET status = $1 WHERE id = $2")
                .bind(dep_status_to_str(status))
                .bind(id.as_str())
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    /// All tasks not yet completed/cancelled for a recording's DAG,
    /// read by the dependency manager each tick (§4.6).
    pub async fn list_incomplete(&self) -> Result<Vec<DependencyTask>, StorageError> {
        let rows = sqlx::query("SELECT * FROM dependency_tasks WHERE status NOT IN ('completed', 'cancelled')")
            .fetch_all(self.gateway.pool())
            .await?;
        rows.iter().map(dependency_task_from_row).collect()
    }
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
