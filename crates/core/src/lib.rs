// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! streamvault-core: domain types, IDs, clock and error abstractions
//! shared by every other StreamVault crate.

pub mod clock;
pub mod domain;
pub mod error;
pub mod id;
pub mod ids;
pub mod path;
pub mod time_fmt;
pub mod timer;
pub mod worker;

pub use clock::{Clock, FakeClock, SystemClock};
pub use domain::{
    ActiveRecordingState, ActiveRecordingStatus, AuthSession, DependencyStatus, DependencyTask,
    GlobalSettings, Payload, Priority, ProcessingStepStatus, ProxySettings, QueueTask,
    QueueTaskStatus, Recording, RecordingProcessingState, RecordingStatus, ShareToken, Stream,
    StreamMetadata, Streamer, StreamerRecordingSettings, StepName,
};
pub use error::{FailureReason, Severity};
pub use id::{IdGen, ShortId, SequentialIdGen, UuidIdGen};
pub use ids::{RecordingId, StreamId, StreamerId, TaskId};
pub use path::{preferred_extension, sanitize_component, VIDEO_EXTENSION_PREFERENCE};
pub use time_fmt::{format_elapsed, format_elapsed_ms};
pub use timer::TimerId;
pub use worker::WorkerId;
