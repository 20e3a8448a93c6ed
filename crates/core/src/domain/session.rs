// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AuthSession` (§3, C12): an operator login session subject to the
//! idle-expiry sweep (§4.12).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>, idle_window: Duration) -> bool {
        now.signed_duration_since(self.last_seen_at) > idle_window
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
