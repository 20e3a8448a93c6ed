// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-level error classification (§7), the type every orchestration
//! component (C4-C12) returns so the worker pool and lifecycle manager can
//! branch on severity without downcasting.

use streamvault_core::Severity;
use streamvault_adapters::ProcessError;
use streamvault_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("process error: {0}")]
    Process(#[from] ProcessError),
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error("recording not found: {0}")]
    RecordingNotFound(String),
    #[error("invalid DAG: {0}")]
    InvalidDag(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{context}: {message}")]
    OperatorVisible { context: String, message: String },
}

impl EngineError {
    pub fn severity(&self) -> Severity {
        match self {
            EngineError::Storage(e) => e.severity(),
            EngineError::Process(_) => Severity::Retryable,
            EngineError::CapacityExceeded(_) => Severity::NonRetryable,
            EngineError::RecordingNotFound(_) => Severity::NonRetryable,
            EngineError::InvalidDag(_) => Severity::NonRetryable,
            EngineError::Io(_) => Severity::Retryable,
            EngineError::OperatorVisible { .. } => Severity::OperatorVisible,
        }
    }
}
