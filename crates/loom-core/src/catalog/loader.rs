// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves a user-supplied phase-list specifier (spec §4.1).

use super::raw::{RawPhase, RawPhaseList};
use super::validate::{self, CatalogError};
use super::presets;
use crate::phase::{Condition, PhaseDefinition, PhaseKind};
use std::path::Path;

/// Errors that can occur while loading a phase list.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read phase list file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse phase list file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown phase kind {0:?} in phase {1}")]
    UnknownKind(String, String),
    #[error(transparent)]
    Validation(#[from] CatalogError),
}

/// Resolve `specifier` into a validated phase list.
///
/// Empty or a known preset name (`default`, `minimal`, `thorough`) returns
/// the built-in preset; anything else is treated as a path to a phase-list
/// file.
pub fn load(specifier: &str) -> Result<Vec<PhaseDefinition>, LoadError> {
    if specifier.is_empty() {
        return Ok(presets::default_preset());
    }
    if let Some(preset) = presets::lookup(specifier) {
        return Ok(preset);
    }
    load_file(Path::new(specifier))
}

/// Parse and validate a phase list from a file on disk.
pub fn load_file(path: &Path) -> Result<Vec<PhaseDefinition>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    load_str(&text, &path.display().to_string())
}

/// `max_retries = 0` in a phase-list file means "inherit the pipeline
/// default" (spec §3); this is the default applied.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Parse and validate a phase list from an in-memory document (the form the
/// file loader ultimately calls into; exposed directly for tests and for
/// callers that already have the document text).
pub fn load_str(text: &str, source_name: &str) -> Result<Vec<PhaseDefinition>, LoadError> {
    let raw: RawPhaseList = toml::from_str(text).map_err(|source| LoadError::Parse {
        path: source_name.to_string(),
        source,
    })?;

    let mut phases = Vec::with_capacity(raw.phases.len());
    for raw_phase in raw.phases {
        phases.push(convert(raw_phase)?);
    }

    validate::validate(&phases)?;
    Ok(phases)
}

fn convert(raw: RawPhase) -> Result<PhaseDefinition, LoadError> {
    let kind = match raw.kind.as_deref() {
        None | Some("worker") => PhaseKind::Worker,
        Some("reviewer") => PhaseKind::Reviewer,
        Some("gate") => PhaseKind::Gate,
        Some(other) => return Err(LoadError::UnknownKind(other.to_string(), raw.name.clone())),
    };

    let condition = Condition::parse(raw.condition.as_deref().unwrap_or(""))
        .map_err(|source| CatalogError::InvalidCondition {
            phase: raw.name.clone(),
            source,
        })?;

    let prompt_name = raw.prompt.clone().unwrap_or_else(|| raw.name.clone());

    let max_retries = if raw.max_retries == 0 {
        DEFAULT_MAX_RETRIES
    } else {
        raw.max_retries
    };

    Ok(PhaseDefinition {
        name: raw.name,
        kind,
        prompt_name,
        command: raw.command,
        max_retries,
        retry_target: raw.retry_target,
        optional: raw.optional,
        condition,
        provider: raw.provider,
        timeout: raw.timeout,
    })
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
