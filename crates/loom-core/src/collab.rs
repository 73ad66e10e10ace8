// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator trait definitions the core consumes.
//!
//! Every trait here is an interface boundary (spec §6): the core depends on
//! these shapes, never on a concrete backend. `loom-fakes` provides
//! in-memory implementations for tests; production backends live outside
//! this workspace.

use crate::input::PromptContext;
use crate::signal::Signal;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Raw output of a provider call, parsed into a [`Signal`] by
/// [`ProviderResult::parse_signal`]. The core never inspects the raw text
/// itself — parsing provider output into a signal is explicitly out of
/// scope (spec §1 Non-goals).
pub trait ProviderResult: Send + Sync {
    fn parse_signal(&self) -> Result<Signal, ParseSignalError>;
}

#[derive(Debug, thiserror::Error)]
#[error("failed to parse provider result: {0}")]
pub struct ParseSignalError(pub String);

/// Runs a prompt against an external completion backend in a working
/// directory.
///
/// Returns a boxed [`ProviderResult`] rather than an associated type so a
/// driver can hold a registry of differently-backed providers behind one
/// type (spec §4.2: "look it up in the registry").
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn execute(
        &self,
        prompt: &str,
        work_dir: &Path,
    ) -> Result<Box<dyn ProviderResult>, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider invocation failed: {0}")]
    Invocation(String),
    #[error("provider call cancelled")]
    Cancelled,
}

/// Runs an external shell command in a working directory, returning a
/// structured signal directly (no parse step — gates report status as-is).
#[async_trait]
pub trait GateRunner: Send + Sync + 'static {
    async fn run(&self, command: &str, work_dir: &Path) -> Result<Signal, GateError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GateError {
    #[error("gate command failed: {0}")]
    Invocation(String),
    #[error("gate call cancelled")]
    Cancelled,
}

/// Composes a prompt template for a named phase from context fields.
#[async_trait]
pub trait PromptLoader: Send + Sync + 'static {
    async fn compose(
        &self,
        prompt_name: &str,
        context: &PromptContext,
    ) -> Result<String, PromptError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("no template registered for prompt {0}")]
    NotFound(String),
    #[error("template composition failed: {0}")]
    Render(String),
}

/// Creates and removes isolated working copies of the repository.
#[async_trait]
pub trait WorktreeManager: Send + Sync + 'static {
    async fn create(&self, id: &str, base_branch: &str) -> Result<(), WorktreeError>;
    async fn remove(&self, id: &str, delete_branch: bool) -> Result<(), WorktreeError>;
    fn path(&self, id: &str) -> PathBuf;
}

#[derive(Debug, thiserror::Error)]
pub enum WorktreeError {
    #[error("failed to create worktree for {id}: {reason}")]
    CreateFailed { id: String, reason: String },
    #[error("failed to remove worktree for {id}: {reason}")]
    RemoveFailed { id: String, reason: String },
}

/// Metadata about the bead a worklog is opened for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeadMeta {
    pub bead_id: String,
    pub title: String,
}

/// A human-readable entry appended to the per-run worklog after each phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklogEntry {
    pub phase: String,
    pub attempt: u32,
    pub summary: String,
}

/// Writes a human-readable per-run log. The on-disk format is out of scope
/// (spec §1 Non-goals) — this trait only describes the operations the
/// driver performs against it.
#[async_trait]
pub trait WorklogManager: Send + Sync + 'static {
    async fn create(&self, work_dir: &Path, bead: &BeadMeta) -> Result<(), WorklogError>;
    async fn append_phase_entry(
        &self,
        work_dir: &Path,
        entry: &WorklogEntry,
    ) -> Result<(), WorklogError>;
    async fn archive(&self, work_dir: &Path, bead_id: &str) -> Result<(), WorklogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum WorklogError {
    #[error("failed to create worklog: {0}")]
    CreateFailed(String),
    #[error("failed to append worklog entry: {0}")]
    AppendFailed(String),
    #[error("failed to archive worklog: {0}")]
    ArchiveFailed(String),
}

/// Persists partial pipeline state keyed by bead ID.
#[async_trait]
pub trait CheckpointStore: Send + Sync + 'static {
    async fn save(
        &self,
        checkpoint: &crate::checkpoint::PipelineCheckpoint,
    ) -> Result<(), CheckpointError>;

    async fn load(
        &self,
        bead_id: &str,
    ) -> Result<Option<crate::checkpoint::PipelineCheckpoint>, CheckpointError>;

    async fn remove(&self, bead_id: &str) -> Result<(), CheckpointError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("failed to save checkpoint: {0}")]
    SaveFailed(String),
    #[error("failed to load checkpoint: {0}")]
    LoadFailed(String),
    #[error("failed to remove checkpoint: {0}")]
    RemoveFailed(String),
}

/// Receives progress updates. The core treats an absent sink as a no-op
/// callable set at construction (spec §9 design notes).
#[async_trait]
pub trait StatusSink: Send + Sync + 'static {
    async fn send(&self, update: crate::status::StatusUpdate);
}

/// A sink that discards every update, used when the driver is constructed
/// without a caller-supplied sink.
#[derive(Debug, Clone, Default)]
pub struct NullStatusSink;

#[async_trait]
impl StatusSink for NullStatusSink {
    async fn send(&self, _update: crate::status::StatusUpdate) {}
}

/// Resolves a deadline for a phase's timeout field into a standard duration,
/// used by the executor when wrapping collaborator calls (spec §4.2).
pub fn effective_timeout(timeout: Option<Duration>) -> Option<Duration> {
    timeout.filter(|d| !d.is_zero())
}
