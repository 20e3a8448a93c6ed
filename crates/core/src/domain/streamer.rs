// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Streamer` (§3): a tracked Twitch channel.

use serde::{Deserialize, Serialize};

use crate::ids::StreamerId;

/// A channel under management. `external_id` is Twitch's numeric user id;
/// `username` is the login name used in API calls, `display_name` the
/// human-facing one shown in notifications and file paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streamer {
    pub id: StreamerId,
    pub external_id: String,
    pub username: String,
    pub display_name: String,
    pub category_name: Option<String>,
    pub is_live: bool,
    pub profile_image_url: Option<String>,
    pub profile_image_archival_url: Option<String>,
    pub banner_url: Option<String>,
    pub is_test_data: bool,
}

impl Streamer {
    pub fn new(id: StreamerId, external_id: impl Into<String>, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id,
            external_id: external_id.into(),
            display_name: username.clone(),
            username,
            category_name: None,
            is_live: false,
            profile_image_url: None,
            profile_image_archival_url: None,
            banner_url: None,
            is_test_data: false,
        }
    }
}

#[cfg(test)]
#[path = "streamer_tests.rs"]
mod tests;
