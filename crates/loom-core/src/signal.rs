// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The status object a phase produces.

use serde::{Deserialize, Serialize};

/// The outcome of a single phase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStatus {
    Pass,
    NeedsWork,
    Skip,
    Error,
}

impl SignalStatus {
    pub fn name(&self) -> &'static str {
        match self {
            SignalStatus::Pass => "PASS",
            SignalStatus::NeedsWork => "NEEDS_WORK",
            SignalStatus::Skip => "SKIP",
            SignalStatus::Error => "ERROR",
        }
    }
}

/// A structured note attached to a signal, reserved for reviewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub summary: String,
    pub detail: String,
}

/// The structured status a phase produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub status: SignalStatus,
    /// Free-form text; for `NEEDS_WORK`, carries the guidance injected into
    /// the next worker attempt.
    #[serde(default)]
    pub feedback: String,
    /// Short human-readable verdict.
    #[serde(default)]
    pub summary: String,
    /// Ordered list of paths touched.
    #[serde(default)]
    pub files_changed: Vec<String>,
    #[serde(default)]
    pub findings: Vec<Finding>,
}

impl Signal {
    pub fn pass(summary: impl Into<String>) -> Signal {
        Signal {
            status: SignalStatus::Pass,
            feedback: String::new(),
            summary: summary.into(),
            files_changed: Vec::new(),
            findings: Vec::new(),
        }
    }

    pub fn needs_work(feedback: impl Into<String>) -> Signal {
        let feedback = feedback.into();
        Signal {
            status: SignalStatus::NeedsWork,
            summary: feedback.clone(),
            feedback,
            files_changed: Vec::new(),
            findings: Vec::new(),
        }
    }

    pub fn skip(summary: impl Into<String>) -> Signal {
        Signal {
            status: SignalStatus::Skip,
            feedback: String::new(),
            summary: summary.into(),
            files_changed: Vec::new(),
            findings: Vec::new(),
        }
    }

    pub fn error(summary: impl Into<String>) -> Signal {
        Signal {
            status: SignalStatus::Error,
            feedback: String::new(),
            summary: summary.into(),
            files_changed: Vec::new(),
            findings: Vec::new(),
        }
    }
}
