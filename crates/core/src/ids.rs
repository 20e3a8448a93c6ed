// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity identifiers (§3: "All identifiers are 64-bit integers unless
//! noted").

crate::define_int_id! {
    /// Primary key of a `Streamer` row.
    pub struct StreamerId;
}

crate::define_int_id! {
    /// Primary key of a `Stream` row.
    pub struct StreamId;
}

crate::define_int_id! {
    /// Primary key of a `Recording` row.
    pub struct RecordingId;
}

crate::define_id! {
    /// Identifier of a `QueueTask`/`DependencyTask` (UUID, per §3).
    pub struct TaskId;
}

impl TaskId {
    /// Generate a fresh random task ID.
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
