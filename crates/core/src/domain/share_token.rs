// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ShareToken` (§3): a time-limited public link to a single recorded
//! stream (I6 / P5: a token is usable iff unexpired).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::StreamId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareToken {
    pub token: String,
    pub stream_id: StreamId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ShareToken {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
#[path = "share_token_tests.rs"]
mod tests;
