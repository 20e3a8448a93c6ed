// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator-configurable settings (§3, §6): global daemon settings and
//! per-streamer recording overrides.

use serde::{Deserialize, Serialize};

use crate::ids::StreamerId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
}

/// Daemon-wide settings (single row). `encryption_key` protects
/// operator-entered secrets (e.g. proxy credentials) at rest and is
/// never logged or serialized into outbound WebSocket snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub encryption_key: String,
    pub proxy: ProxySettings,
    pub default_quality: String,
    pub concurrent_worker_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamerRecordingSettings {
    pub streamer_id: StreamerId,
    pub quality: Option<String>,
    pub auto_record: bool,
    pub priority: Option<i32>,
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
