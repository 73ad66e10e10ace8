// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-attempt records of phase execution.

use crate::signal::Signal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Recorded per attempt of a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub phase_name: String,
    pub signal: Signal,
    /// 1-based attempt number.
    pub attempt: u32,
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    pub started_at: DateTime<Utc>,
}

impl PhaseResult {
    pub fn new(
        phase_name: impl Into<String>,
        signal: Signal,
        attempt: u32,
        duration: Duration,
        started_at: DateTime<Utc>,
    ) -> PhaseResult {
        PhaseResult {
            phase_name: phase_name.into(),
            signal,
            attempt,
            duration,
            started_at,
        }
    }

    /// A zero-duration result for a phase that was skipped without running
    /// (condition unmet). Used by the driver for §4.4 step 3.
    pub fn skipped(phase_name: impl Into<String>, summary: impl Into<String>) -> PhaseResult {
        PhaseResult {
            phase_name: phase_name.into(),
            signal: crate::signal::Signal::skip(summary),
            attempt: 1,
            duration: Duration::ZERO,
            started_at: Utc::now(),
        }
    }
}
