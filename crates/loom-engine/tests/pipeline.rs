// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box end-to-end scenarios driven entirely through the public
//! `loom-engine` API, against `loom-fakes` collaborators.

use loom_core::catalog::{default_preset, minimal_preset};
use loom_core::checkpoint::PipelineCheckpoint;
use loom_core::input::PipelineInput;
use loom_core::phase::PhaseDefinition;
use loom_core::result::PhaseResult;
use loom_core::signal::Signal;
use loom_engine::{Collaborators, PipelineDriver, ProviderRegistry};
use loom_fakes::{
    FakeCheckpointStore, FakeGateRunner, FakePromptLoader, FakeProvider, FakeStatusSink,
    FakeWorklogManager, FakeWorktreeManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn collaborators(provider: FakeProvider) -> (Collaborators, FakeCheckpointStore) {
    let checkpoints = FakeCheckpointStore::new();
    let collaborators = Collaborators {
        providers: ProviderRegistry::new(Arc::new(provider)),
        gate_runner: Arc::new(FakeGateRunner::new()),
        prompt_loader: Arc::new(FakePromptLoader::new()),
        worktree_manager: Arc::new(FakeWorktreeManager::new("/tmp/loom-engine-pipeline-tests")),
        worklog_manager: Arc::new(FakeWorklogManager::new()),
        checkpoint_store: Arc::new(checkpoints.clone()),
        status_sink: Arc::new(FakeStatusSink::new()),
    };
    (collaborators, checkpoints)
}

#[tokio::test]
async fn minimal_pipeline_completes_end_to_end() {
    let provider = FakeProvider::new("default");
    provider.push_signal(Signal::pass("tests written"));
    provider.push_signal(Signal::pass("implemented"));
    provider.push_signal(Signal::pass("merged"));
    let (collaborators, checkpoints) = collaborators(provider);

    let driver = PipelineDriver::new(minimal_preset(), collaborators);
    let output = driver
        .run(
            PipelineInput::new("bead-e2e-1", "Ship the thing"),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(output.completed);
    assert_eq!(output.phase_results.len(), 3);
    assert!(!checkpoints.contains("bead-e2e-1"));
}

#[tokio::test]
async fn default_pipeline_survives_one_reviewer_retry() {
    let provider = FakeProvider::new("default");
    for signal in [
        Signal::pass("tests written"),
        Signal::pass("tests look fine"),
        Signal::pass("execute v1"),
        Signal::needs_work("add error handling"),
        Signal::pass("execute v2"),
        Signal::pass("execute approved"),
        Signal::pass("signed off"),
        Signal::pass("merged"),
    ] {
        provider.push_signal(signal);
    }
    let (collaborators, _checkpoints) = collaborators(provider);

    let driver = PipelineDriver::new(default_preset(), collaborators);
    let output = driver
        .run(
            PipelineInput::new("bead-e2e-2", "Ship the thing"),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(output.completed);
    assert_eq!(output.phase_results.len(), 8);
}

#[tokio::test]
async fn exhausting_retries_leaves_the_run_resumable() {
    let provider = FakeProvider::new("default");
    provider.push_signal(Signal::pass("execute v1"));
    provider.push_signal(Signal::needs_work("nope"));
    provider.push_signal(Signal::needs_work("still nope"));
    let phases = vec![
        PhaseDefinition::worker("execute"),
        PhaseDefinition::reviewer("review", "execute", 2),
    ];
    let (collaborators, checkpoints) = collaborators(provider);

    let driver = PipelineDriver::new(phases, collaborators);
    let err = driver
        .run(
            PipelineInput::new("bead-e2e-3", "Ship the thing"),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.phase, "review");
    assert!(checkpoints.contains("bead-e2e-3"));
}

#[tokio::test]
async fn resuming_from_a_checkpoint_does_not_redo_completed_phases() {
    let provider = FakeProvider::new("default");
    provider.push_signal(Signal::pass("execute v1"));
    provider.push_signal(Signal::pass("merged"));
    let (collaborators, checkpoints) = collaborators(provider.clone());
    checkpoints.seed(PipelineCheckpoint::new(
        "bead-e2e-4",
        vec![PhaseResult::new(
            "test-writer",
            Signal::pass("already written"),
            1,
            Duration::ZERO,
            chrono::Utc::now(),
        )],
    ));

    let driver = PipelineDriver::new(minimal_preset(), collaborators);
    let output = driver
        .run(
            PipelineInput::new("bead-e2e-4", "Ship the thing"),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(output.completed);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn a_cancelled_token_pauses_the_run_before_the_next_phase() {
    let provider = FakeProvider::new("default");
    let (collaborators, checkpoints) = collaborators(provider);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let driver = PipelineDriver::new(minimal_preset(), collaborators);
    let err = driver
        .run(PipelineInput::new("bead-e2e-5", "Ship the thing"), cancel)
        .await
        .unwrap_err();

    assert!(err.is_paused());
    assert!(checkpoints.contains("bead-e2e-5"));
}
