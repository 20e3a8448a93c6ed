// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction (C1): monotonic time for timers/backoff, wall-clock
//! time for entity timestamps and episode-month derivation.
//!
//! Every timestamped decision in the engine (heartbeat staleness, retry
//! backoff, episode-month rollover, session/token expiry) goes through this
//! trait so tests can advance time deterministically instead of sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// Abstracts over wall-clock and monotonic time.
pub trait Clock: Clone + Send + Sync + 'static {
    /// A monotonic instant, suitable for measuring elapsed durations.
    fn now_instant(&self) -> Instant;

    /// Current wall-clock time in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current wall-clock time as milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> u64 {
        self.now_utc().timestamp_millis().max(0) as u64
    }
}

/// Real clock backed by the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_instant(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests: starts at a fixed instant/epoch and only
/// advances when told to. `Instant::now()` is still used as the monotonic
/// base (Rust has no way to fabricate an `Instant`), but elapsed-duration
/// math is performed against an offset so tests can simulate the passage
/// of arbitrary amounts of time without real sleeps.
#[derive(Clone)]
pub struct FakeClock {
    base_instant: Instant,
    offset_ms: Arc<AtomicU64>,
    base_epoch_ms: u64,
}

impl FakeClock {
    pub fn new(base_epoch_ms: u64) -> Self {
        Self {
            base_instant: Instant::now(),
            offset_ms: Arc::new(AtomicU64::new(0)),
            base_epoch_ms,
        }
    }

    /// Advance the fake clock by `ms` milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.offset_ms.fetch_add(ms, Ordering::SeqCst);
    }

    fn offset(&self) -> u64 {
        self.offset_ms.load(Ordering::SeqCst)
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::new(epoch_ms)
    }
}

impl Clock for FakeClock {
    fn now_instant(&self) -> Instant {
        self.base_instant + std::time::Duration::from_millis(self.offset())
    }

    fn now_utc(&self) -> DateTime<Utc> {
        let ms = self.base_epoch_ms + self.offset();
        DateTime::<Utc>::from_timestamp_millis(ms as i64).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
