// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Database Gateway (C3): the sole durable store for StreamVault, per §3
//! of the spec ("a relational database as its only durable store").

pub mod error;
pub mod gateway;
pub mod repo;
pub mod retry;

pub use error::StorageError;
pub use gateway::Gateway;
pub use repo::active_recording_state::ActiveRecordingRepo;
pub use repo::processing_state::ProcessingStateRepo;
pub use repo::recordings::RecordingRepo;
pub use repo::session::SessionRepo;
pub use repo::settings::SettingsRepo;
pub use repo::share_tokens::ShareTokenRepo;
pub use repo::stream_metadata::StreamMetadataRepo;
pub use repo::streamers::StreamerRepo;
pub use repo::streams::StreamRepo;
pub use repo::tasks::{DependencyTaskRepo, QueueTaskRepo};
pub use retry::with_retry;
