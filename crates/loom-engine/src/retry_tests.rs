// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::executor::{PhaseExecutor, ProviderRegistry};
use loom_core::phase::PhaseDefinition;
use loom_core::result::PhaseResult;
use loom_core::signal::{Signal, SignalStatus};
use loom_fakes::{FakeGateRunner, FakePromptLoader, FakeProvider};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn executor(provider: FakeProvider) -> PhaseExecutor {
    PhaseExecutor::new(
        ProviderRegistry::new(Arc::new(provider)),
        Arc::new(FakeGateRunner::new()),
        Arc::new(FakePromptLoader::new()),
    )
}

fn prior_worker_result() -> PhaseResult {
    PhaseResult::new(
        "execute",
        Signal::pass("first draft"),
        1,
        Duration::ZERO,
        chrono::Utc::now(),
    )
}

#[tokio::test]
async fn reviewer_passing_on_first_attempt_does_not_touch_the_worker() {
    let provider = FakeProvider::new("default");
    provider.push_signal(Signal::pass("looks good"));
    let exec = executor(provider.clone());

    let worker = PhaseDefinition::worker("execute");
    let reviewer = PhaseDefinition::reviewer("execute-review", "execute", 3);

    let outcome = run_pair(
        &exec,
        &worker,
        &reviewer,
        &prior_worker_result(),
        &PromptContext::default(),
        Path::new("/work"),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.final_signal.status, SignalStatus::Pass);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].phase_name, "execute-review");
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn needs_work_retries_the_worker_with_feedback_then_passes() {
    let provider = FakeProvider::new("default");
    provider.push_signal(Signal::needs_work("add a test"));
    provider.push_signal(Signal::pass("revised draft"));
    provider.push_signal(Signal::pass("approved"));
    let exec = executor(provider.clone());

    let worker = PhaseDefinition::worker("execute");
    let reviewer = PhaseDefinition::reviewer("execute-review", "execute", 3);

    let outcome = run_pair(
        &exec,
        &worker,
        &reviewer,
        &prior_worker_result(),
        &PromptContext::default(),
        Path::new("/work"),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.final_signal.status, SignalStatus::Pass);
    // reviewer (NEEDS_WORK), worker (retry), reviewer (PASS)
    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.results[1].phase_name, "execute");
    assert_eq!(outcome.results[1].attempt, 2);

    let worker_calls = provider.calls();
    assert_eq!(worker_calls.len(), 3);
}

#[tokio::test]
async fn feedback_is_threaded_into_the_next_worker_prompt() {
    let provider = FakeProvider::new("default");
    provider.push_signal(Signal::needs_work("missing error handling"));
    provider.push_signal(Signal::pass("fixed"));
    let prompts = FakePromptLoader::new();
    let exec = PhaseExecutor::new(
        ProviderRegistry::new(Arc::new(provider)),
        Arc::new(FakeGateRunner::new()),
        Arc::new(prompts.clone()),
    );

    let worker = PhaseDefinition::worker("execute");
    let reviewer = PhaseDefinition::reviewer("execute-review", "execute", 2);

    run_pair(
        &exec,
        &worker,
        &reviewer,
        &prior_worker_result(),
        &PromptContext::default(),
        Path::new("/work"),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let worker_calls: Vec<_> = prompts
        .calls()
        .into_iter()
        .filter(|(name, _)| name == "execute")
        .collect();
    assert_eq!(worker_calls.len(), 1);
    assert_eq!(
        worker_calls[0].1.feedback.as_deref(),
        Some("missing error handling")
    );
}

#[tokio::test]
async fn retries_exhausted_surfaces_as_a_pipeline_error() {
    let provider = FakeProvider::new("default");
    provider.push_signal(Signal::needs_work("still wrong"));
    let exec = executor(provider);

    let worker = PhaseDefinition::worker("execute");
    let reviewer = PhaseDefinition::reviewer("execute-review", "execute", 1);

    let err = run_pair(
        &exec,
        &worker,
        &reviewer,
        &prior_worker_result(),
        &PromptContext::default(),
        Path::new("/work"),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.phase, "execute-review");
    assert_eq!(err.signal.as_ref().unwrap().status, SignalStatus::NeedsWork);
}

#[tokio::test]
async fn reviewer_error_signal_short_circuits_the_pair() {
    let provider = FakeProvider::new("default");
    provider.push_signal(Signal::error("reviewer blew up"));
    let exec = executor(provider);

    let worker = PhaseDefinition::worker("execute");
    let reviewer = PhaseDefinition::reviewer("execute-review", "execute", 3);

    let err = run_pair(
        &exec,
        &worker,
        &reviewer,
        &prior_worker_result(),
        &PromptContext::default(),
        Path::new("/work"),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.phase, "execute-review");
}

#[tokio::test]
async fn worker_error_signal_on_retry_short_circuits_the_pair() {
    let provider = FakeProvider::new("default");
    provider.push_signal(Signal::needs_work("try again"));
    provider.push_signal(Signal::error("worker blew up"));
    let exec = executor(provider);

    let worker = PhaseDefinition::worker("execute");
    let reviewer = PhaseDefinition::reviewer("execute-review", "execute", 3);

    let err = run_pair(
        &exec,
        &worker,
        &reviewer,
        &prior_worker_result(),
        &PromptContext::default(),
        Path::new("/work"),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.phase, "execute");
    assert_eq!(err.attempt, 2);
}
