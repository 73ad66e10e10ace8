// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Emits [`StatusUpdate`]s to the configured [`StatusSink`] (spec §5: a
//! `running` event strictly precedes the terminal event for the same
//! phase/attempt).

use loom_core::collab::StatusSink;
use loom_core::signal::Signal;
use loom_core::status::{progress_string, StatusState, StatusUpdate};
use std::sync::Arc;
use std::time::Duration;

pub struct StatusReporter {
    sink: Arc<dyn StatusSink>,
    bead_id: String,
    total_phases: usize,
}

impl StatusReporter {
    pub fn new(sink: Arc<dyn StatusSink>, bead_id: impl Into<String>, total_phases: usize) -> Self {
        StatusReporter {
            sink,
            bead_id: bead_id.into(),
            total_phases,
        }
    }

    pub async fn running(&self, phase: &str, index: usize, attempt: u32, max_retry: u32) {
        self.sink
            .send(StatusUpdate::running(
                self.bead_id.clone(),
                phase,
                progress_string(index, self.total_phases),
                attempt,
                max_retry,
            ))
            .await;
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn terminal(
        &self,
        phase: &str,
        index: usize,
        status: StatusState,
        attempt: u32,
        max_retry: u32,
        signal: Signal,
        duration: Duration,
    ) {
        self.sink
            .send(StatusUpdate::terminal(
                self.bead_id.clone(),
                phase,
                status,
                progress_string(index, self.total_phases),
                attempt,
                max_retry,
                signal,
                duration,
            ))
            .await;
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
