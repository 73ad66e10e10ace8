// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase definitions — the static description of one step of a pipeline.

use std::time::Duration;

/// The kind of work a phase performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    /// Produces artifacts via the provider.
    Worker,
    /// Evaluates prior artifacts via the provider; may demand a retry.
    Reviewer,
    /// Runs a shell command via the gate runner.
    Gate,
}

impl PhaseKind {
    pub fn name(&self) -> &'static str {
        match self {
            PhaseKind::Worker => "worker",
            PhaseKind::Reviewer => "reviewer",
            PhaseKind::Gate => "gate",
        }
    }
}

/// A parsed `files_match:<glob>` condition, or no condition at all.
///
/// This is the only supported grammar (spec §6); anything else is rejected
/// at load time by [`crate::catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// No condition — the phase always runs.
    Always,
    /// Runs iff at least one path in the working directory matches the glob.
    FilesMatch(String),
}

impl Condition {
    /// Parse the condition grammar from a phase definition's `condition` field.
    ///
    /// An empty string means "always run". Any non-empty string must start
    /// with `files_match:` and carry a non-empty glob.
    pub fn parse(raw: &str) -> Result<Condition, ConditionParseError> {
        if raw.is_empty() {
            return Ok(Condition::Always);
        }
        match raw.split_once(':') {
            Some(("files_match", glob)) if !glob.is_empty() => {
                Ok(Condition::FilesMatch(glob.to_string()))
            }
            Some(("files_match", _)) => Err(ConditionParseError::EmptyGlob),
            _ => Err(ConditionParseError::UnknownPrefix(raw.to_string())),
        }
    }

    /// Evaluate the condition against a working directory.
    ///
    /// `files_match` walks the directory and checks every entry's path
    /// (relative to `work_dir`) against the glob pattern.
    pub fn evaluate(&self, work_dir: &std::path::Path) -> Result<bool, ConditionEvalError> {
        match self {
            Condition::Always => Ok(true),
            Condition::FilesMatch(pattern) => {
                let matcher = glob::Pattern::new(pattern)
                    .map_err(|e| ConditionEvalError::BadGlob(pattern.clone(), e.to_string()))?;
                let mut found = false;
                for entry in walk(work_dir) {
                    let entry =
                        entry.map_err(|e| ConditionEvalError::Io(work_dir.to_path_buf(), e))?;
                    let relative = entry
                        .strip_prefix(work_dir)
                        .unwrap_or(entry.as_path())
                        .to_string_lossy()
                        .replace('\\', "/");
                    if matcher.matches(&relative) {
                        found = true;
                        break;
                    }
                }
                Ok(found)
            }
        }
    }
}

/// Minimal recursive directory walk; avoids pulling in a walker crate for a
/// single-purpose traversal.
fn walk(root: &std::path::Path) -> Vec<std::io::Result<std::path::PathBuf>> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) => {
                out.push(Err(e));
                continue;
            }
        };
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_dir() {
                        stack.push(path.clone());
                    }
                    out.push(Ok(path));
                }
                Err(e) => out.push(Err(e)),
            }
        }
    }
    out
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConditionParseError {
    #[error("unknown condition prefix: {0}")]
    UnknownPrefix(String),
    #[error("files_match condition requires a non-empty glob")]
    EmptyGlob,
}

#[derive(Debug, thiserror::Error)]
pub enum ConditionEvalError {
    #[error("invalid glob {0}: {1}")]
    BadGlob(String, String),
    #[error("failed to read {0}: {1}")]
    Io(std::path::PathBuf, #[source] std::io::Error),
}

/// Describes one phase of a pipeline.
///
/// See spec §3 for the field-by-field contract and §4.5 for the invariants
/// enforced at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseDefinition {
    /// Unique within the pipeline; identifies the phase in status events and
    /// checkpoints.
    pub name: String,
    pub kind: PhaseKind,
    /// Template name for provider-backed phases; defaults to `name`.
    pub prompt_name: String,
    /// Shell command; required for `Gate`, ignored otherwise.
    pub command: Option<String>,
    /// Upper bound on attempts of the worker/reviewer pair this phase
    /// participates in. `0` means "inherit pipeline default" (§3); resolved
    /// to a concrete value by the catalog loader before the driver ever
    /// sees it, so by the time a `PhaseDefinition` reaches the driver this
    /// is always `>= 1`.
    pub max_retries: u32,
    /// For `Reviewer`, the name of the `Worker` to re-run on `NEEDS_WORK`.
    pub retry_target: Option<String>,
    /// If true, a `Gate`'s error does not abort the pipeline.
    pub optional: bool,
    pub condition: Condition,
    /// Optional name selecting an alternate provider from the driver's
    /// provider registry; empty means the default provider.
    pub provider: Option<String>,
    /// When set, the executor bounds this phase's provider/gate call with a
    /// deadline. `None`/zero means no additional deadline.
    pub timeout: Option<Duration>,
}

impl PhaseDefinition {
    /// Construct a worker phase with sensible defaults (no retry target, not
    /// optional, always runs, default provider, no timeout).
    pub fn worker(name: impl Into<String>) -> PhaseDefinition {
        let name = name.into();
        PhaseDefinition {
            prompt_name: name.clone(),
            name,
            kind: PhaseKind::Worker,
            command: None,
            max_retries: 1,
            retry_target: None,
            optional: false,
            condition: Condition::Always,
            provider: None,
            timeout: None,
        }
    }

    /// Construct a reviewer phase that retries `retry_target` on `NEEDS_WORK`.
    pub fn reviewer(
        name: impl Into<String>,
        retry_target: impl Into<String>,
        max_retries: u32,
    ) -> PhaseDefinition {
        let name = name.into();
        PhaseDefinition {
            prompt_name: name.clone(),
            name,
            kind: PhaseKind::Reviewer,
            command: None,
            max_retries,
            retry_target: Some(retry_target.into()),
            optional: false,
            condition: Condition::Always,
            provider: None,
            timeout: None,
        }
    }

    /// Construct a gate phase running `command`.
    pub fn gate(name: impl Into<String>, command: impl Into<String>) -> PhaseDefinition {
        let name = name.into();
        PhaseDefinition {
            prompt_name: name.clone(),
            name,
            kind: PhaseKind::Gate,
            command: Some(command.into()),
            max_retries: 1,
            retry_target: None,
            optional: false,
            condition: Condition::Always,
            provider: None,
            timeout: None,
        }
    }

    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
