// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use loom_core::collab::ProviderError;
use loom_core::phase::PhaseDefinition;
use loom_core::signal::SignalStatus;
use loom_fakes::{FakeGateRunner, FakePromptLoader, FakeProvider};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn executor(provider: FakeProvider, gate: FakeGateRunner, prompts: FakePromptLoader) -> PhaseExecutor {
    PhaseExecutor::new(
        ProviderRegistry::new(Arc::new(provider)),
        Arc::new(gate),
        Arc::new(prompts),
    )
}

#[tokio::test]
async fn dispatches_gate_phase_to_gate_runner() {
    let gate = FakeGateRunner::new();
    gate.set_response("cargo test", Signal::pass("green"));
    let exec = executor(FakeProvider::new("default"), gate, FakePromptLoader::new());

    let phase = PhaseDefinition::gate("tests", "cargo test");
    let result = exec
        .execute_once(
            &phase,
            &PromptContext::default(),
            Path::new("/work"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.status, SignalStatus::Pass);
}

#[tokio::test]
async fn dispatches_worker_phase_through_prompt_loader_and_provider() {
    let provider = FakeProvider::new("default");
    provider.push_signal(Signal::pass("done"));
    let prompts = FakePromptLoader::new();
    prompts.register_template("execute", "Build: {{ title }}");
    let exec = executor(provider.clone(), FakeGateRunner::new(), prompts);

    let phase = PhaseDefinition::worker("execute");
    let context = PromptContext {
        title: "thing".to_string(),
        ..PromptContext::default()
    };
    exec.execute_once(&phase, &context, Path::new("/work"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(provider.calls()[0].prompt, "Build: thing");
}

#[tokio::test]
async fn unknown_named_provider_is_an_error() {
    let exec = executor(
        FakeProvider::new("default"),
        FakeGateRunner::new(),
        FakePromptLoader::new(),
    );
    let mut phase = PhaseDefinition::worker("execute");
    phase.provider = Some("nonexistent".to_string());

    let err = exec
        .execute_once(
            &phase,
            &PromptContext::default(),
            Path::new("/work"),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutorError::UnknownProvider(name) if name == "nonexistent"));
}

#[tokio::test]
async fn named_provider_is_resolved_and_used() {
    let default_provider = FakeProvider::new("default");
    default_provider.push_signal(Signal::error("should not be called"));
    let named = FakeProvider::new("claude");
    named.push_signal(Signal::pass("handled by claude"));

    let providers = ProviderRegistry::new(Arc::new(default_provider))
        .with_provider("claude", Arc::new(named.clone()));
    let exec = PhaseExecutor::new(
        providers,
        Arc::new(FakeGateRunner::new()),
        Arc::new(FakePromptLoader::new()),
    );

    let mut phase = PhaseDefinition::worker("execute");
    phase.provider = Some("claude".to_string());

    let result = exec
        .execute_once(
            &phase,
            &PromptContext::default(),
            Path::new("/work"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.status, SignalStatus::Pass);
    assert_eq!(named.call_count(), 1);
}

#[tokio::test]
async fn cancellation_short_circuits_the_call() {
    let exec = executor(
        FakeProvider::new("default"),
        FakeGateRunner::new(),
        FakePromptLoader::new(),
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    let phase = PhaseDefinition::worker("execute");
    let err = exec
        .execute_once(&phase, &PromptContext::default(), Path::new("/work"), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutorError::Cancelled));
}

#[tokio::test(start_paused = true)]
async fn timeout_fires_when_the_phase_outlives_its_deadline() {
    let provider = FakeProvider::new("default");
    provider.set_delay(Duration::from_secs(60));
    provider.push_signal(Signal::pass("eventually"));
    let exec = executor(provider, FakeGateRunner::new(), FakePromptLoader::new());

    let mut phase = PhaseDefinition::worker("execute");
    phase.timeout = Some(Duration::from_secs(1));

    let result = exec
        .execute_once(
            &phase,
            &PromptContext::default(),
            Path::new("/work"),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(ExecutorError::TimedOut(d)) if d == Duration::from_secs(1)));
}

#[tokio::test(start_paused = true)]
async fn zero_timeout_means_no_deadline() {
    let provider = FakeProvider::new("default");
    provider.set_delay(Duration::from_secs(60));
    provider.push_signal(Signal::pass("eventually"));
    let exec = executor(provider, FakeGateRunner::new(), FakePromptLoader::new());

    let mut phase = PhaseDefinition::worker("execute");
    phase.timeout = Some(Duration::ZERO);

    let result = exec
        .execute_once(
            &phase,
            &PromptContext::default(),
            Path::new("/work"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.status, SignalStatus::Pass);
}

#[tokio::test]
async fn provider_error_propagates_as_executor_error() {
    let provider = FakeProvider::new("default");
    provider.push_error(ProviderError::Invocation("boom".to_string()));
    let exec = executor(provider, FakeGateRunner::new(), FakePromptLoader::new());

    let phase = PhaseDefinition::worker("execute");
    let err = exec
        .execute_once(
            &phase,
            &PromptContext::default(),
            Path::new("/work"),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutorError::Provider(_)));
}
