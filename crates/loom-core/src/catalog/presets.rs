// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in phase-list presets (spec §4.1).

use crate::phase::PhaseDefinition;

/// `test-writer` → `test-review` → `execute` → `execute-review` →
/// `sign-off` → `merge` (6 phases).
pub fn default_preset() -> Vec<PhaseDefinition> {
    vec![
        PhaseDefinition::worker("test-writer"),
        PhaseDefinition::reviewer("test-review", "test-writer", 3),
        PhaseDefinition::worker("execute"),
        PhaseDefinition::reviewer("execute-review", "execute", 3),
        PhaseDefinition::reviewer("sign-off", "execute", 3),
        PhaseDefinition::worker("merge").with_max_retries(1),
    ]
}

/// `test-writer` → `execute` → `merge` (3 phases).
pub fn minimal_preset() -> Vec<PhaseDefinition> {
    vec![
        PhaseDefinition::worker("test-writer"),
        PhaseDefinition::worker("execute"),
        PhaseDefinition::worker("merge").with_max_retries(1),
    ]
}

/// `default_preset` plus a `test-quality` reviewer after `test-writer` and
/// an optional `lint` gate after `execute`.
///
/// The spec's summary table labels this preset "7 phases", but its own
/// composition ("default plus test-quality and lint") yields 8 when
/// `default`'s `sign-off` reviewer is kept — see DESIGN.md for the decision
/// to trust the explicit composition over the summary count.
pub fn thorough_preset() -> Vec<PhaseDefinition> {
    vec![
        PhaseDefinition::worker("test-writer"),
        PhaseDefinition::reviewer("test-review", "test-writer", 3),
        PhaseDefinition::reviewer("test-quality", "test-writer", 3),
        PhaseDefinition::worker("execute"),
        PhaseDefinition::reviewer("execute-review", "execute", 3),
        PhaseDefinition::gate("lint", "cargo clippy --all-targets -- -D warnings")
            .with_optional(true),
        PhaseDefinition::reviewer("sign-off", "execute", 3),
        PhaseDefinition::worker("merge").with_max_retries(1),
    ]
}

/// Resolve a preset by name. Returns `None` if `name` is not a known preset.
pub fn lookup(name: &str) -> Option<Vec<PhaseDefinition>> {
    match name {
        "default" => Some(default_preset()),
        "minimal" => Some(minimal_preset()),
        "thorough" => Some(thorough_preset()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "presets_tests.rs"]
mod tests;
