// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress events delivered to the consumer that renders them.

use crate::signal::Signal;
use std::time::Duration;

/// The lifecycle state of a single phase attempt, as observed by a
/// [`crate::collab::StatusSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusState {
    Running,
    Passed,
    Failed,
    Error,
    Skipped,
}

impl StatusState {
    pub fn name(&self) -> &'static str {
        match self {
            StatusState::Running => "running",
            StatusState::Passed => "passed",
            StatusState::Failed => "failed",
            StatusState::Error => "error",
            StatusState::Skipped => "skipped",
        }
    }

    /// Every state but `Running` is terminal for a given phase+attempt
    /// (spec §5 ordering guarantee: running strictly precedes any terminal
    /// event).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StatusState::Running)
    }
}

/// A single progress update, emitted synchronously to the status sink.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub bead_id: String,
    pub phase: String,
    pub status: StatusState,
    /// Formatted as "i/N".
    pub progress: String,
    pub attempt: u32,
    pub max_retry: u32,
    /// Present only on completion events; absent on `running`.
    pub signal: Option<Signal>,
    /// Present only on completion events; absent on `running`.
    pub duration: Option<Duration>,
}

impl StatusUpdate {
    /// Build a `running` update — no signal, no duration.
    pub fn running(
        bead_id: impl Into<String>,
        phase: impl Into<String>,
        progress: impl Into<String>,
        attempt: u32,
        max_retry: u32,
    ) -> StatusUpdate {
        StatusUpdate {
            bead_id: bead_id.into(),
            phase: phase.into(),
            status: StatusState::Running,
            progress: progress.into(),
            attempt,
            max_retry,
            signal: None,
            duration: None,
        }
    }

    /// Build a terminal update carrying the phase's resulting signal and
    /// elapsed time.
    pub fn terminal(
        bead_id: impl Into<String>,
        phase: impl Into<String>,
        status: StatusState,
        progress: impl Into<String>,
        attempt: u32,
        max_retry: u32,
        signal: Signal,
        duration: Duration,
    ) -> StatusUpdate {
        debug_assert!(status.is_terminal());
        StatusUpdate {
            bead_id: bead_id.into(),
            phase: phase.into(),
            status,
            progress: progress.into(),
            attempt,
            max_retry,
            signal: Some(signal),
            duration: Some(duration),
        }
    }
}

/// Format a 1-based phase index/total pipeline length as the "i/N" progress
/// string used throughout status updates and error messages.
pub fn progress_string(index: usize, total: usize) -> String {
    format!("{}/{}", index, total)
}
