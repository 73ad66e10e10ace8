// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted partial pipeline state, keyed by bead ID.

use crate::result::PhaseResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of phase results for a bead, persisted by the driver after every
/// phase and on pause, loaded by the driver at start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineCheckpoint {
    pub bead_id: String,
    pub phase_results: Vec<PhaseResult>,
    pub saved_at: DateTime<Utc>,
}

impl PipelineCheckpoint {
    pub fn new(bead_id: impl Into<String>, phase_results: Vec<PhaseResult>) -> PipelineCheckpoint {
        PipelineCheckpoint {
            bead_id: bead_id.into(),
            phase_results,
            saved_at: Utc::now(),
        }
    }

    /// Names of phases recorded with a `PASS` or `SKIP` signal — the set a
    /// resumed run treats as already done (spec §4.4 step 3).
    pub fn completed_phase_names(&self) -> impl Iterator<Item = &str> {
        self.phase_results.iter().filter_map(|r| {
            matches!(
                r.signal.status,
                crate::signal::SignalStatus::Pass | crate::signal::SignalStatus::Skip
            )
            .then_some(r.phase_name.as_str())
        })
    }
}
