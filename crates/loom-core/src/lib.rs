// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Domain model and phase catalog for a multi-phase pipeline orchestration
//! core.
//!
//! This crate has no I/O of its own beyond reading phase-list files from
//! disk; every external collaborator (provider, gate runner, worktree and
//! worklog managers, checkpoint store, status sink) is a trait in
//! [`collab`], consumed — never implemented — here. See `loom-engine` for
//! the orchestrator built against these traits and `loom-fakes` for
//! in-memory implementations used in tests.

pub mod catalog;
pub mod checkpoint;
pub mod collab;
pub mod error;
pub mod input;
pub mod phase;
pub mod result;
pub mod signal;
pub mod status;

pub use checkpoint::PipelineCheckpoint;
pub use collab::{
    BeadMeta, CheckpointStore, GateRunner, NullStatusSink, PromptLoader, Provider, ProviderResult,
    StatusSink, WorklogEntry, WorklogManager, WorktreeManager,
};
pub use error::PipelineError;
pub use input::{validate_bead_id, InvalidBeadId, PipelineInput, PipelineOutput, PromptContext};
pub use phase::{Condition, PhaseDefinition, PhaseKind};
pub use result::PhaseResult;
pub use signal::{Finding, Signal, SignalStatus};
pub use status::{progress_string, StatusState, StatusUpdate};
