// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run input and output of the pipeline driver.

use crate::result::PhaseResult;

/// Bead ID validation error — applied wherever a bead ID crosses a path
/// boundary (spec §6, "applied by the worklog archive path builder").
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum InvalidBeadId {
    #[error("bead id must not be empty")]
    Empty,
    #[error("bead id must not start with '-'")]
    LeadingDash,
    #[error("bead id must not contain path separators")]
    PathSeparator,
    #[error("bead id must not be '.' or '..'")]
    DotOrDotDot,
}

/// Validate a bead ID against the constraints in spec §6.
pub fn validate_bead_id(id: &str) -> Result<(), InvalidBeadId> {
    if id.is_empty() {
        return Err(InvalidBeadId::Empty);
    }
    if id.starts_with('-') {
        return Err(InvalidBeadId::LeadingDash);
    }
    if id.contains('/') || id.contains('\\') {
        return Err(InvalidBeadId::PathSeparator);
    }
    if id == "." || id == ".." {
        return Err(InvalidBeadId::DotOrDotDot);
    }
    Ok(())
}

/// Prior completed tasks surfaced to prompt composition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiblingContext {
    pub entries: Vec<String>,
}

/// Input to a single pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineInput {
    pub bead_id: String,
    pub title: String,
    pub description: String,
    /// Defaulted by the driver when absent.
    pub base_branch: Option<String>,
    pub sibling_context: SiblingContext,
    /// Names the caller asserts are already done.
    pub skip_phases: Vec<String>,
}

impl PipelineInput {
    pub fn new(bead_id: impl Into<String>, title: impl Into<String>) -> PipelineInput {
        PipelineInput {
            bead_id: bead_id.into(),
            title: title.into(),
            description: String::new(),
            base_branch: None,
            sibling_context: SiblingContext::default(),
            skip_phases: Vec::new(),
        }
    }
}

/// Output of a single pipeline invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    /// Phases executed during this invocation — excludes phases skipped due
    /// to the resume checkpoint (spec §4.6).
    pub phase_results: Vec<PhaseResult>,
    /// Set only on clean success.
    pub completed: bool,
}

impl PipelineOutput {
    pub fn empty() -> PipelineOutput {
        PipelineOutput::default()
    }
}

/// Arguments passed to [`crate::collab::PromptLoader::compose`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    pub bead_id: String,
    pub title: String,
    pub description: String,
    pub sibling_context: Vec<String>,
    /// Set on a worker's retry attempt to the most recent reviewer feedback.
    pub feedback: Option<String>,
}

impl PromptContext {
    pub fn from_input(input: &PipelineInput) -> PromptContext {
        PromptContext {
            bead_id: input.bead_id.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            sibling_context: input.sibling_context.entries.clone(),
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}
