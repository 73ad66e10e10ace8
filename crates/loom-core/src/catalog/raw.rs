// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw phase-list document types that mirror the file format exactly
//! (spec §6). Parsing-only; converted to [`crate::phase::PhaseDefinition`]
//! by [`super::loader`] after validation.

use serde::Deserialize;
use std::time::Duration;

/// Top-level phase-list document: `{ phases = [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPhaseList {
    pub phases: Vec<RawPhase>,
}

/// One phase entry in the file format.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RawPhase {
    pub name: String,
    pub kind: Option<String>,
    pub prompt: Option<String>,
    pub command: Option<String>,
    pub max_retries: u32,
    pub retry_target: Option<String>,
    pub optional: bool,
    pub condition: Option<String>,
    pub provider: Option<String>,
    #[serde(with = "humantime_serde", default)]
    pub timeout: Option<Duration>,
}

#[cfg(test)]
#[path = "raw_tests.rs"]
mod tests;
