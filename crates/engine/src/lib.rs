// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! streamvault-engine: the orchestration core (C4-C12). Composes the
//! storage gateway and process/transport adapters into the Progress
//! Tracker, Worker Pool, Dependency Manager, Task Queue Manager,
//! Recording Lifecycle Manager, Post-Processing handlers, Recovery
//! Subsystem, WebSocket Fan-Out, and Session/Token Cleanup.

pub mod cleanup;
pub mod dependency;
pub mod error;
pub mod fanout;
pub mod handlers;
pub mod lifecycle;
pub mod paths;
pub mod progress;
pub mod queue_manager;
pub mod recovery;
pub mod worker_pool;

pub use cleanup::{CleanupConfig, CleanupReport, run_cleanup_sweep};
pub use dependency::{DagNode, DependencyManager, TransitionEffect};
pub use error::EngineError;
pub use fanout::{Fanout, OutboundMessage, StreamerQueueStats};
pub use handlers::{
    CleanupHandler, MetadataGenerationHandler, Mp4RemuxHandler, Mp4ValidationHandler,
    SegmentConcatenationHandler, StaticChapterSource, ThumbnailGenerationHandler, ChapterSource, Cue,
};
pub use lifecycle::{LifecycleConfig, LiveStreamInfo, RecordingLifecycleManager, StopReason};
pub use paths::RecordingPaths;
pub use progress::{ProgressEvent, ProgressStats, ProgressTracker, SharedProgressTracker, TaskState, TrackedTask};
pub use queue_manager::{QueueManagerConfig, TaskQueueManager};
pub use recovery::{
    enqueue_orphan_check, run_reaper_sweep, scan_for_orphans, OrphanFinding, OrphanRecoveryCheckHandler, ReaperConfig,
    ReaperReport, ORPHAN_CHECK_RATE_LIMITED_SENTINEL,
};
pub use worker_pool::{ProgressFn, TaskHandler, WorkerPool};
