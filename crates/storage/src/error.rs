// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage-layer error classification (§7). Every repository method
//! returns [`StorageError`] so callers above (the retry decorator, the
//! worker pool) can branch on [`Severity`] without matching on `sqlx`
//! internals.

use streamvault_core::Severity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("row not found")]
    NotFound,
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    /// Classify per §7: constraint/not-found fail immediately, anything
    /// else from the driver is treated as transient and retried.
    pub fn severity(&self) -> Severity {
        match self {
            StorageError::NotFound | StorageError::Constraint(_) => Severity::NonRetryable,
            StorageError::Database(e) => classify_sqlx(e),
            StorageError::Migration(_) => Severity::OperatorVisible,
        }
    }
}

fn classify_sqlx(err: &sqlx::Error) -> Severity {
    match err {
        sqlx::Error::RowNotFound => Severity::NonRetryable,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() || db_err.is_check_violation() => {
            Severity::NonRetryable
        }
        _ => Severity::Retryable,
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
