// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The invariant suite from spec §3/§4.5, applied at load time.

use crate::phase::{Condition, ConditionParseError, PhaseDefinition, PhaseKind};
use std::collections::{HashMap, HashSet};

/// A validation failure, always naming the offending phase (spec §4.1 step 4).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate phase name: {0}")]
    DuplicateName(String),
    #[error("gate phase {0} has no command")]
    GateMissingCommand(String),
    #[error("worker phase {0} must not have a retry target")]
    WorkerHasRetryTarget(String),
    #[error("reviewer phase {0} has no retry target")]
    ReviewerMissingRetryTarget(String),
    #[error("phase {phase} retry target {target} does not name an earlier phase")]
    UnknownRetryTarget { phase: String, target: String },
    #[error("phase {phase} retry target {target} is not a worker phase")]
    RetryTargetNotWorker { phase: String, target: String },
    #[error("phase {phase} has an invalid condition: {source}")]
    InvalidCondition {
        phase: String,
        #[source]
        source: ConditionParseError,
    },
    #[error("retry-target cycle detected starting at phase {0}")]
    RetryTargetCycle(String),
    #[error("unknown phase kind {kind} in phase {phase}")]
    UnknownKind { phase: String, kind: String },
}

/// Run the full validation suite against an already-parsed phase list.
///
/// Order matches spec §4.5: duplicate names; gate without command; worker
/// with retry target; unknown/non-worker retry target; condition syntax;
/// retry-target cycle.
pub fn validate(phases: &[PhaseDefinition]) -> Result<(), CatalogError> {
    check_duplicate_names(phases)?;
    check_gate_commands(phases)?;
    check_retry_targets(phases)?;
    check_conditions(phases)?;
    check_cycles(phases)?;
    Ok(())
}

fn check_duplicate_names(phases: &[PhaseDefinition]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for p in phases {
        if !seen.insert(p.name.as_str()) {
            return Err(CatalogError::DuplicateName(p.name.clone()));
        }
    }
    Ok(())
}

fn check_gate_commands(phases: &[PhaseDefinition]) -> Result<(), CatalogError> {
    for p in phases {
        if p.kind == PhaseKind::Gate && p.command.as_deref().unwrap_or("").is_empty() {
            return Err(CatalogError::GateMissingCommand(p.name.clone()));
        }
    }
    Ok(())
}

fn check_retry_targets(phases: &[PhaseDefinition]) -> Result<(), CatalogError> {
    let index_of: HashMap<&str, usize> =
        phases.iter().enumerate().map(|(i, p)| (p.name.as_str(), i)).collect();

    for (i, p) in phases.iter().enumerate() {
        match p.kind {
            PhaseKind::Worker => {
                if p.retry_target.is_some() {
                    return Err(CatalogError::WorkerHasRetryTarget(p.name.clone()));
                }
            }
            PhaseKind::Reviewer => {
                let target = p
                    .retry_target
                    .as_deref()
                    .ok_or_else(|| CatalogError::ReviewerMissingRetryTarget(p.name.clone()))?;

                let target_index =
                    index_of
                        .get(target)
                        .copied()
                        .ok_or_else(|| CatalogError::UnknownRetryTarget {
                            phase: p.name.clone(),
                            target: target.to_string(),
                        })?;

                if target_index >= i {
                    return Err(CatalogError::UnknownRetryTarget {
                        phase: p.name.clone(),
                        target: target.to_string(),
                    });
                }

                if phases[target_index].kind != PhaseKind::Worker {
                    return Err(CatalogError::RetryTargetNotWorker {
                        phase: p.name.clone(),
                        target: target.to_string(),
                    });
                }
            }
            PhaseKind::Gate => {}
        }
    }
    Ok(())
}

fn check_conditions(phases: &[PhaseDefinition]) -> Result<(), CatalogError> {
    for p in phases {
        // Re-checks a Condition built by hand, not just ones from the file loader.
        if let Condition::FilesMatch(glob) = &p.condition {
            if glob.is_empty() {
                return Err(CatalogError::InvalidCondition {
                    phase: p.name.clone(),
                    source: ConditionParseError::EmptyGlob,
                });
            }
        }
    }
    Ok(())
}

/// Walk the retry-target graph from each reviewer with a visited set,
/// looking for cycles. Linear-time; no topological sort needed because
/// phase order is already given by the list (spec §9 design notes).
fn check_cycles(phases: &[PhaseDefinition]) -> Result<(), CatalogError> {
    let by_name: HashMap<&str, &PhaseDefinition> =
        phases.iter().map(|p| (p.name.as_str(), p)).collect();

    for start in phases {
        if start.kind != PhaseKind::Reviewer {
            continue;
        }
        let mut visited = HashSet::new();
        visited.insert(start.name.as_str());
        let mut current = start.retry_target.as_deref();

        while let Some(name) = current {
            if !visited.insert(name) {
                return Err(CatalogError::RetryTargetCycle(start.name.clone()));
            }
            current = by_name
                .get(name)
                .and_then(|p| p.retry_target.as_deref());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
