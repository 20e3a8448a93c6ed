// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Grace period between the capture tool's graceful-stop signal and a
/// force-kill (§4.1, §9 Open Question: 15s default, configurable).
pub fn capture_termination_grace() -> Duration {
    parse_duration_ms("STREAMVAULT_CAPTURE_TERM_GRACE_MS").unwrap_or(Duration::from_secs(15))
}

/// Timeout for the muxer's segment-concatenation invocation (§4.8).
pub fn concat_timeout() -> Duration {
    parse_duration_ms("STREAMVAULT_CONCAT_TIMEOUT_MS").unwrap_or(Duration::from_secs(600))
}

/// Timeout for the muxer's TS->MP4 remux invocation (§4.8).
pub fn remux_timeout() -> Duration {
    parse_duration_ms("STREAMVAULT_REMUX_TIMEOUT_MS").unwrap_or(Duration::from_secs(600))
}

/// Timeout for the container probe used by validation and thumbnail timing.
pub fn probe_timeout() -> Duration {
    parse_duration_ms("STREAMVAULT_PROBE_TIMEOUT_MS").unwrap_or(Duration::from_secs(30))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
