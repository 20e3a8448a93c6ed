// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry-with-backoff wrapper used on every write-path repository call
//! (§4.2). Up to 5 attempts, base delay 0.5s, capped at 10s, full
//! jitter. Only [`Severity::Retryable`] errors are retried; anything
//! else returns immediately.

use std::time::Duration;

use rand::Rng;
use streamvault_core::Severity;
use tracing::warn;

use crate::error::StorageError;

const MAX_ATTEMPTS: u32 = 5;
const BASE_DELAY: Duration = Duration::from_millis(500);
const MAX_DELAY: Duration = Duration::from_secs(10);

fn backoff_delay(attempt: u32) -> Duration {
    let exp = BASE_DELAY.saturating_mul(1u32 << attempt.min(16));
    let capped = exp.min(MAX_DELAY);
    let jittered_ms = rand::thread_rng().gen_range(0..=capped.as_millis() as u64);
    Duration::from_millis(jittered_ms)
}

/// Run `op` until it succeeds, a non-retryable error surfaces, or
/// `MAX_ATTEMPTS` is exhausted.
pub async fn with_retry<T, F, Fut>(operation: &str, mut op: F) -> Result<T, StorageError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, StorageError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.severity() == Severity::Retryable && attempt + 1 < MAX_ATTEMPTS => {
                let delay = backoff_delay(attempt);
                warn!(operation, attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying after transient storage error");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
