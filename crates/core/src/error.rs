// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error classification (§7).
//!
//! Every error kind surfaced by storage/adapters/engine carries a
//! [`Severity`] so the retry decorator and the worker pool can decide what
//! to do with it without downcasting or string-matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of an error for retry/propagation purposes (§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Transient I/O, DB serialization failure, subprocess start timeout.
    /// Handled by the retry decorator with exponential backoff + jitter.
    Retryable,
    /// Not-found, auth, constraint violation, malformed input. Surfaced
    /// immediately; the task moves straight to `failed`.
    NonRetryable,
    /// Process died, pending DAG steps. Durable state is left as-is; the
    /// recovery subsystem resumes on next boot.
    RecoverableAtBoot,
    /// Permission denied, missing tool. Logged with context, surfaced on
    /// the WebSocket error channel, no automatic retry past the configured
    /// limit.
    OperatorVisible,
}

impl Severity {
    pub fn is_retryable(self) -> bool {
        matches!(self, Severity::Retryable)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Retryable => "retryable",
            Severity::NonRetryable => "non_retryable",
            Severity::RecoverableAtBoot => "recoverable_at_boot",
            Severity::OperatorVisible => "operator_visible",
        };
        write!(f, "{s}")
    }
}

/// A short machine-readable tag attached to user-visible failures (§7:
/// "a stable `failure_reason` tag"), alongside a one-line human reason and
/// a timestamp recorded on the `Recording` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureReason {
    pub tag: String,
    pub message: String,
}

impl FailureReason {
    pub fn new(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
