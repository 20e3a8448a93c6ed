// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! streamvault-daemon library surface: the IPC protocol types shared
//! between `streamvaultd` and the `streamvault` CLI.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod lock;
pub mod protocol;
pub mod protocol_wire;

pub use lock::{DaemonError, Paths};
pub use protocol::{
    HealthSummary, OkPayload, Request, Response, StreamerQueueStatsEntry, TaskStatsSummary, TrackedTaskEntry,
};
pub use protocol_wire::{
    decode, encode, read_message, read_request, write_message, write_response, ProtocolError, DEFAULT_TIMEOUT,
    MAX_MESSAGE_SIZE,
};
