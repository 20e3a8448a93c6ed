// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency Manager (C6): a task DAG owned in memory, mirrored in
//! `RecordingProcessingState` by the caller (C7). Ties in
//! [`DependencyManager::get_ready_tasks`] are broken by `(priority asc,
//! created_at asc)` per §4.5.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use streamvault_core::{DependencyStatus, DependencyTask, Priority, TaskId};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// A DAG node, carrying the retry/priority bookkeeping the core's
/// storage-facing [`DependencyTask`] leaves out (that type only mirrors
/// what's persisted; priority and attempt counts are a runtime-only
/// concern of this in-memory manager).
#[derive(Debug, Clone)]
pub struct DagNode {
    pub task: DependencyTask,
    pub priority: Priority,
    pub attempts: u32,
    pub max_attempts: u32,
    pub last_error: Option<String>,
}

impl DagNode {
    pub fn new(task: DependencyTask, priority: Priority) -> Self {
        Self {
            task,
            priority,
            attempts: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            last_error: None,
        }
    }

    fn sort_key(&self) -> (Priority, DateTime<Utc>) {
        (self.priority, self.task.created_at)
    }
}

/// Outcome of a `mark_completed`/`mark_failed` call: which dependents were
/// newly unblocked or propagated to a terminal state, so the caller (C7)
/// can enqueue/notify without re-scanning the whole DAG.
#[derive(Debug, Default)]
pub struct TransitionEffect {
    pub newly_ready: Vec<TaskId>,
    pub newly_failed: Vec<TaskId>,
    pub newly_cancelled: Vec<TaskId>,
}

#[derive(Debug, Default)]
pub struct DependencyManager {
    nodes: HashMap<TaskId, DagNode>,
}

impl DependencyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// I3: every `depends_on` entry must reference a task already added.
    pub fn add_task(&mut self, node: DagNode) -> Result<(), String> {
        for dep in &node.task.depends_on {
            if !self.nodes.contains_key(dep) {
                return Err(format!("dependency {dep} not present (added out of order)"));
            }
        }
        self.nodes.insert(node.task.id.clone(), node);
        Ok(())
    }

    fn completed_ids(&self) -> HashSet<TaskId> {
        self.nodes
            .values()
            .filter(|n| n.task.status == DependencyStatus::Completed)
            .map(|n| n.task.id.clone())
            .collect()
    }

    /// P4: only tasks whose dependencies are ALL completed, and which are
    /// still `Pending`, are returned. Ordered `(priority asc, created_at
    /// asc)`.
    pub fn get_ready_tasks(&mut self) -> Vec<TaskId> {
        let completed = self.completed_ids();
        let mut ready: Vec<TaskId> = self
            .nodes
            .values()
            .filter(|n| n.task.status == DependencyStatus::Pending && n.task.is_ready(&completed))
            .map(|n| n.task.id.clone())
            .collect();
        ready.sort_by_key(|id| self.nodes[id].sort_key());
        for id in &ready {
            if let Some(node) = self.nodes.get_mut(id) {
                node.task.status = DependencyStatus::Ready;
            }
        }
        ready
    }

    pub fn mark_running(&mut self, id: &TaskId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.task.status = DependencyStatus::Running;
        }
    }

    /// running -> completed, then re-evaluate dependents (§4.5).
    pub fn mark_completed(&mut self, id: &TaskId) -> TransitionEffect {
        if let Some(node) = self.nodes.get_mut(id) {
            node.task.status = DependencyStatus::Completed;
        }
        let completed = self.completed_ids();
        let newly_ready: Vec<TaskId> = self
            .nodes
            .values()
            .filter(|n| n.task.status == DependencyStatus::Pending && n.task.is_ready(&completed))
            .map(|n| n.task.id.clone())
            .collect();
        TransitionEffect {
            newly_ready,
            ..Default::default()
        }
    }

    /// running -> failed (retries exhausted) or back to pending (retry
    /// left). Exhaustion propagates failure to every transitive dependent
    /// (S5: "Dependencies failed: [<id>]").
    ///
    /// `exhausted` lets a caller that already retried the task itself
    /// (the worker pool retries up to its own `max_attempts` before ever
    /// reporting `Failed`) force propagation on the first call, instead of
    /// this manager re-counting attempts it never saw and leaving the node
    /// `Pending` with no dependent ever re-promoting it.
    pub fn mark_failed(&mut self, id: &TaskId, error: impl Into<String>, exhausted: bool) -> TransitionEffect {
        let error = error.into();
        let exhausted = match self.nodes.get_mut(id) {
            Some(node) => {
                node.attempts += 1;
                node.last_error = Some(error.clone());
                if exhausted || node.attempts >= node.max_attempts {
                    node.task.status = DependencyStatus::Failed;
                    true
                } else {
                    node.task.status = DependencyStatus::Pending;
                    false
                }
            }
            None => return TransitionEffect::default(),
        };

        if !exhausted {
            return TransitionEffect::default();
        }
        let newly_failed = self.propagate_failure(id, &error);
        TransitionEffect {
            newly_failed,
            ..Default::default()
        }
    }

    fn propagate_failure(&mut self, failed_id: &TaskId, reason: &str) -> Vec<TaskId> {
        let mut propagated = Vec::new();
        let mut frontier = vec![failed_id.clone()];
        while let Some(cur) = frontier.pop() {
            let dependents: Vec<TaskId> = self
                .nodes
                .values()
                .filter(|n| n.task.depends_on.contains(&cur) && n.task.status != DependencyStatus::Failed)
                .map(|n| n.task.id.clone())
                .collect();
            for dep in dependents {
                if let Some(node) = self.nodes.get_mut(&dep) {
                    node.task.status = DependencyStatus::Failed;
                    node.last_error = Some(format!("Dependencies failed: [{failed_id}]"));
                    let _ = reason;
                }
                propagated.push(dep.clone());
                frontier.push(dep);
            }
        }
        propagated
    }

    pub fn retry_failed(&mut self, id: &TaskId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.task.status = DependencyStatus::Pending;
            node.attempts = 0;
        }
    }

    /// any -> cancelled, propagated to every dependent (§4.5; §9 Open
    /// Question: partially-written sidecars are preserved, not deleted —
    /// this manager only updates status, never touches the filesystem).
    pub fn cancel(&mut self, id: &TaskId) -> TransitionEffect {
        let mut cancelled = Vec::new();
        let mut frontier = vec![id.clone()];
        while let Some(cur) = frontier.pop() {
            if let Some(node) = self.nodes.get_mut(&cur) {
                if node.task.status == DependencyStatus::Cancelled {
                    continue;
                }
                node.task.status = DependencyStatus::Cancelled;
            } else {
                continue;
            }
            cancelled.push(cur.clone());
            let dependents: Vec<TaskId> = self
                .nodes
                .values()
                .filter(|n| n.task.depends_on.contains(&cur))
                .map(|n| n.task.id.clone())
                .collect();
            frontier.extend(dependents);
        }
        TransitionEffect {
            newly_cancelled: cancelled,
            ..Default::default()
        }
    }

    pub fn get(&self, id: &TaskId) -> Option<&DagNode> {
        self.nodes.get(id)
    }

    pub fn is_dag_complete(&self, ids: &[TaskId]) -> bool {
        ids.iter()
            .all(|id| self.nodes.get(id).map(|n| n.task.status == DependencyStatus::Completed).unwrap_or(false))
    }
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
