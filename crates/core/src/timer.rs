// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer identifier type for tracking scheduled timers.
//!
//! `TimerId` uniquely identifies a recurring or one-shot timer used to drive
//! the periodic subsystems described in §5 of the spec: capture monitor
//! ticks (10s), the dependency-worker promotion tick (100ms), the stats
//! broadcaster (10s), and the reaper (30s).

use crate::ids::{RecordingId, StreamId, TaskId};

crate::define_id! {
    /// Unique identifier for a timer instance.
    pub struct TimerId;
}

impl TimerId {
    /// Timer for the per-stream capture monitor loop (§4.7, 10s poll).
    pub fn capture_monitor(stream_id: StreamId) -> Self {
        Self::new(format!("capture-monitor:{}", stream_id))
    }

    /// Timer for the global dependency-promotion tick (§5, 100ms).
    pub fn dependency_tick() -> Self {
        Self::new("dependency-tick")
    }

    /// Timer for the queue-stats broadcaster (§4.6/§4.10, 10s).
    pub fn stats_broadcast() -> Self {
        Self::new("stats-broadcast")
    }

    /// Timer for the auto-reaper sweep (§4.9, 30s).
    pub fn reaper_sweep() -> Self {
        Self::new("reaper-sweep")
    }

    /// Timer for a bounded retry backoff on a specific queue task.
    pub fn task_retry(task_id: &TaskId) -> Self {
        Self::new(format!("task-retry:{}", task_id))
    }

    /// Timer for the age-based self-cancellation of an orphan-recovery-check
    /// task tied to a recording (§4.9: "older than 2 min -> cancel").
    pub fn orphan_check_expiry(recording_id: RecordingId) -> Self {
        Self::new(format!("orphan-check-expiry:{}", recording_id))
    }

    /// Timer for session/share-token periodic cleanup sweeps (§4.11).
    pub fn cleanup_sweep() -> Self {
        Self::new("cleanup-sweep")
    }

    pub fn is_capture_monitor(&self) -> bool {
        self.0.starts_with("capture-monitor:")
    }

    pub fn is_task_retry(&self) -> bool {
        self.0.starts_with("task-retry:")
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
