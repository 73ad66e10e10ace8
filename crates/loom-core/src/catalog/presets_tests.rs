// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::phase::PhaseKind;

#[test]
fn default_preset_has_six_phases_in_order() {
    let phases = default_preset();
    let names: Vec<&str> = phases.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "test-writer",
            "test-review",
            "execute",
            "execute-review",
            "sign-off",
            "merge"
        ]
    );
}

#[test]
fn default_preset_merge_has_max_one_attempt() {
    let phases = default_preset();
    let merge = phases.iter().find(|p| p.name == "merge").unwrap();
    assert_eq!(merge.max_retries, 1);
    assert_eq!(merge.kind, PhaseKind::Worker);
}

#[test]
fn minimal_preset_has_three_phases() {
    let phases = minimal_preset();
    let names: Vec<&str> = phases.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["test-writer", "execute", "merge"]);
}

#[test]
fn thorough_preset_adds_test_quality_and_lint() {
    let phases = thorough_preset();
    let names: Vec<&str> = phases.iter().map(|p| p.name.as_str()).collect();
    assert!(names.contains(&"test-quality"));
    let lint = phases.iter().find(|p| p.name == "lint").unwrap();
    assert_eq!(lint.kind, PhaseKind::Gate);
    assert!(lint.optional);
}

#[test]
fn lookup_resolves_known_names_and_rejects_unknown() {
    assert!(lookup("default").is_some());
    assert!(lookup("minimal").is_some());
    assert!(lookup("thorough").is_some());
    assert!(lookup("bespoke").is_none());
}

#[test]
fn all_presets_validate() {
    for preset in [default_preset(), minimal_preset(), thorough_preset()] {
        super::super::validate::validate(&preset).expect("preset should be internally valid");
    }
}
