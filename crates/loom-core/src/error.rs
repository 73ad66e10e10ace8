// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced at the driver boundary.

use crate::signal::Signal;
use std::fmt;

/// A boxed source error, used when the underlying collaborator failure type
/// doesn't need to be named at this layer (spec §4.2: "wrapped so the phase
/// name is part of the message").
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The sentinel phase name used for setup/teardown errors (`attempt == 0`).
pub const PHASE_SETUP: &str = "setup";
pub const PHASE_TEARDOWN: &str = "teardown";
pub const PHASE_PAUSE: &str = "pause";

/// A fatal error surfaced by the pipeline driver.
///
/// See spec §7 for the taxonomy this type covers (setup, validation, phase
/// execution, reviewer/gate/worker ERROR, retry exhaustion, teardown,
/// pause).
#[derive(Debug)]
pub struct PipelineError {
    pub phase: String,
    /// `0` denotes setup or teardown.
    pub attempt: u32,
    pub signal: Option<Signal>,
    pub cause: Option<BoxError>,
}

impl PipelineError {
    pub fn setup(cause: impl Into<BoxError>) -> PipelineError {
        PipelineError {
            phase: PHASE_SETUP.to_string(),
            attempt: 0,
            signal: None,
            cause: Some(cause.into()),
        }
    }

    pub fn teardown(cause: impl Into<BoxError>) -> PipelineError {
        PipelineError {
            phase: PHASE_TEARDOWN.to_string(),
            attempt: 0,
            signal: None,
            cause: Some(cause.into()),
        }
    }

    /// The sentinel returned when `pauseRequested` observed a pause between
    /// phases. Carries no cause and no signal — callers distinguish it from
    /// hard failures by phase name alone (spec §7 item 7).
    pub fn paused() -> PipelineError {
        PipelineError {
            phase: PHASE_PAUSE.to_string(),
            attempt: 0,
            signal: None,
            cause: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == PHASE_PAUSE
    }

    pub fn execution(
        phase: impl Into<String>,
        attempt: u32,
        cause: impl Into<BoxError>,
    ) -> PipelineError {
        PipelineError {
            phase: phase.into(),
            attempt,
            signal: None,
            cause: Some(cause.into()),
        }
    }

    pub fn signal_error(phase: impl Into<String>, attempt: u32, signal: Signal) -> PipelineError {
        PipelineError {
            phase: phase.into(),
            attempt,
            signal: Some(signal),
            cause: None,
        }
    }

    pub fn retries_exhausted(
        phase: impl Into<String>,
        attempt: u32,
        max_retries: u32,
        signal: Signal,
    ) -> PipelineError {
        PipelineError {
            phase: phase.into(),
            attempt,
            signal: Some(signal),
            cause: Some(format!("max retries ({}) exceeded", max_retries).into()),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {}", self.phase)?;
        if self.attempt > 0 {
            write!(f, " (attempt {})", self.attempt)?;
        }
        match (&self.signal, &self.cause) {
            (Some(signal), None) => {
                write!(f, ": status {}: {}", signal.status.name(), signal.feedback)
            }
            (_, Some(cause)) => write!(f, ": {}", cause),
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}
