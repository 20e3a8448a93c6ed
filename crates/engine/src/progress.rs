// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress Tracker (C4): an in-memory registry of tasks — queue-owned and
//! "external" (captures owned by the lifecycle manager) alike — with
//! throttled change notifications (§4.3, §9 REDESIGN FLAG: "external
//! tasks" become a boolean on the same entity rather than a parallel map).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use streamvault_core::{Clock, TaskId};

/// Retention window for completed entries before [`ProgressTracker::sweep`]
/// removes them (§4.3 default).
pub const COMPLETED_RETENTION: chrono::Duration = chrono::Duration::hours(24);

/// Minimum progress delta, in percentage points, that triggers a
/// notification on its own (§4.3).
const PROGRESS_NOTIFY_THRESHOLD: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone)]
pub struct TrackedTask {
    pub id: TaskId,
    pub task_type: String,
    pub state: TaskState,
    pub progress: u8,
    /// Captures tracked by the lifecycle manager rather than a worker
    /// (§9 REDESIGN FLAG: a boolean, not a parallel map).
    pub external: bool,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub retry_count: u32,
}

impl TrackedTask {
    fn new(id: TaskId, task_type: impl Into<String>, external: bool, now: DateTime<Utc>) -> Self {
        Self {
            id,
            task_type: task_type.into(),
            state: TaskState::Pending,
            progress: 0,
            external,
            created_at: now,
            started_at: None,
            completed_at: None,
            error_message: None,
            retry_count: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    StatusChanged(TrackedTask),
    ProgressChanged { id: TaskId, progress: u8 },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressStats {
    pub active: usize,
    pub completed: usize,
    pub external: usize,
}

type Callback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Three keyed maps — `active`, `completed`, `external` — exactly as
/// §4.3 describes, unified onto one entity type via the `external` flag.
pub struct ProgressTracker<C: Clock> {
    clock: C,
    active: Mutex<HashMap<TaskId, TrackedTask>>,
    completed: Mutex<HashMap<TaskId, TrackedTask>>,
    callbacks: Mutex<Vec<Callback>>,
}

impl<C: Clock> ProgressTracker<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            active: Mutex::new(HashMap::new()),
            completed: Mutex::new(HashMap::new()),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn register_progress_callback(&self, callback: impl Fn(ProgressEvent) + Send + Sync + 'static) {
        self.callbacks.lock().push(Box::new(callback));
    }

    fn notify(&self, event: ProgressEvent) {
        for cb in self.callbacks.lock().iter() {
            cb(event.clone());
        }
    }

    pub fn add(&self, id: TaskId, task_type: impl Into<String>, external: bool) {
        let now = self.clock.now_utc();
        let task = TrackedTask::new(id.clone(), task_type, external, now);
        self.active.lock().insert(id, task.clone());
        self.notify(ProgressEvent::StatusChanged(task));
    }

    /// Status transitions always notify (§4.3). Moves the entry to
    /// `completed` once it reaches [`TaskState::Completed`]/[`TaskState::Failed`].
    pub fn update_status(&self, id: &TaskId, state: TaskState, error_message: Option<String>) {
        let now = self.clock.now_utc();
        let mut active = self.active.lock();
        let Some(mut task) = active.remove(id) else {
            return;
        };
        task.state = state;
        task.error_message = error_message;
        match state {
            TaskState::Running if task.started_at.is_none() => task.started_at = Some(now),
            TaskState::Completed => {
                task.progress = 100;
                task.completed_at = Some(now);
            }
            TaskState::Failed => task.completed_at = Some(now),
            _ => {}
        }

        if matches!(state, TaskState::Completed | TaskState::Failed) {
            self.completed.lock().insert(id.clone(), task.clone());
        } else {
            active.insert(id.clone(), task.clone());
        }
        drop(active);
        self.notify(ProgressEvent::StatusChanged(task));
    }

    pub fn increment_retry(&self, id: &TaskId) {
        if let Some(task) = self.active.lock().get_mut(id) {
            task.retry_count += 1;
        }
    }

    /// Progress updates notify only on a >=5pp jump or on reaching 100
    /// (§4.3 throttle, P11).
    pub fn update_progress(&self, id: &TaskId, progress: u8) {
        let progress = progress.min(100);
        let should_notify = {
            let mut active = self.active.lock();
            let Some(task) = active.get_mut(id) else {
                return;
            };
            let delta = progress.saturating_sub(task.progress);
            let reached_full = progress == 100 && task.progress != 100;
            task.progress = progress;
            delta >= PROGRESS_NOTIFY_THRESHOLD || reached_full
        };
        if should_notify {
            self.notify(ProgressEvent::ProgressChanged { id: id.clone(), progress });
        }
    }

    pub fn get(&self, id: &TaskId) -> Option<TrackedTask> {
        self.active
            .lock()
            .get(id)
            .cloned()
            .or_else(|| self.completed.lock().get(id).cloned())
    }

    pub fn active_tasks(&self) -> Vec<TrackedTask> {
        self.active.lock().values().cloned().collect()
    }

    pub fn recent_completed(&self) -> Vec<TrackedTask> {
        self.completed.lock().values().cloned().collect()
    }

    pub fn stats(&self) -> ProgressStats {
        let active = self.active.lock();
        ProgressStats {
            active: active.values().filter(|t| !t.external).count(),
            completed: self.completed.lock().len(),
            external: active.values().filter(|t| t.external).count(),
        }
    }

    /// Drops completed entries older than [`COMPLETED_RETENTION`] (§4.3).
    pub fn sweep(&self) {
        let cutoff = self.clock.now_utc() - COMPLETED_RETENTION;
        self.completed.lock().retain(|_, t| t.completed_at.map(|c| c > cutoff).unwrap_or(true));
    }
}

pub type SharedProgressTracker<C> = Arc<ProgressTracker<C>>;

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
