// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the Process Supervisor (C2) over capture
//! and remux child processes, and the WebSocket Fan-Out transport (C11).

pub mod env;
pub mod process;
pub mod subprocess;
pub mod transport;

pub use process::{
    CaptureSpec, ProcessError, ProcessId, ProcessProgress, ProcessRunStatus, ProcessSupervisor, RotatingLogWriter,
    TokioProcessSupervisor,
};
pub use transport::{FanoutTransport, TungsteniteFanout};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use process::FakeProcessSupervisor;
#[cfg(any(test, feature = "test-support"))]
pub use transport::FakeFanoutTransport;
