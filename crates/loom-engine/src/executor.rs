// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves a single phase attempt into a [`Signal`] (spec §4.2).
//!
//! The executor is the only place that calls into [`Provider`] and
//! [`GateRunner`]; the retry coordinator and driver never touch them
//! directly.

use loom_core::collab::{GateRunner, Provider, PromptLoader};
use loom_core::error::PipelineError;
use loom_core::input::PromptContext;
use loom_core::phase::{PhaseDefinition, PhaseKind};
use loom_core::signal::Signal;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Resolves a phase's `provider` field to a concrete [`Provider`].
///
/// Holds the default provider plus any number of named alternates; phases
/// with an empty `provider` field use the default (spec §4.2: "look it up
/// in the registry — unknown name is an error naming the provider").
#[derive(Clone)]
pub struct ProviderRegistry {
    default: Arc<dyn Provider>,
    named: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new(default: Arc<dyn Provider>) -> ProviderRegistry {
        ProviderRegistry {
            default,
            named: HashMap::new(),
        }
    }

    pub fn with_provider(mut self, name: impl Into<String>, provider: Arc<dyn Provider>) -> Self {
        self.named.insert(name.into(), provider);
        self
    }

    pub fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn Provider>, ExecutorError> {
        match name {
            None => Ok(self.default.clone()),
            Some(name) => self
                .named
                .get(name)
                .cloned()
                .ok_or_else(|| ExecutorError::UnknownProvider(name.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("unknown provider {0}")]
    UnknownProvider(String),
    #[error("phase execution cancelled")]
    Cancelled,
    #[error("phase execution timed out after {0:?}")]
    TimedOut(Duration),
    #[error(transparent)]
    Provider(#[from] loom_core::collab::ProviderError),
    #[error(transparent)]
    Gate(#[from] loom_core::collab::GateError),
    #[error(transparent)]
    Prompt(#[from] loom_core::collab::PromptError),
    #[error(transparent)]
    Parse(#[from] loom_core::collab::ParseSignalError),
}

/// Runs a single attempt of one phase against its collaborators.
pub struct PhaseExecutor {
    providers: ProviderRegistry,
    gate_runner: Arc<dyn GateRunner>,
    prompt_loader: Arc<dyn PromptLoader>,
}

impl PhaseExecutor {
    pub fn new(
        providers: ProviderRegistry,
        gate_runner: Arc<dyn GateRunner>,
        prompt_loader: Arc<dyn PromptLoader>,
    ) -> PhaseExecutor {
        PhaseExecutor {
            providers,
            gate_runner,
            prompt_loader,
        }
    }

    /// Run `phase` once, bounding the collaborator call by the phase's
    /// timeout (if any) and the shared cancellation token.
    #[tracing::instrument(skip(self, prompt_context, cancel), fields(phase = %phase.name))]
    pub async fn execute_once(
        &self,
        phase: &PhaseDefinition,
        prompt_context: &PromptContext,
        work_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<Signal, ExecutorError> {
        let call = self.dispatch(phase, prompt_context, work_dir);
        let timeout = loom_core::collab::effective_timeout(phase.timeout);
        let bounded = async move {
            match timeout {
                Some(timeout) => match tokio::time::timeout(timeout, call).await {
                    Ok(result) => result,
                    Err(_) => Err(ExecutorError::TimedOut(timeout)),
                },
                None => call.await,
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExecutorError::Cancelled),
            result = bounded => result,
        };

        if let Ok(signal) = &outcome {
            tracing::info!(status = signal.status.name(), "phase attempt finished");
        }
        outcome
    }

    async fn dispatch(
        &self,
        phase: &PhaseDefinition,
        prompt_context: &PromptContext,
        work_dir: &Path,
    ) -> Result<Signal, ExecutorError> {
        match phase.kind {
            PhaseKind::Gate => {
                let command = phase.command.as_deref().unwrap_or_default();
                Ok(self.gate_runner.run(command, work_dir).await?)
            }
            PhaseKind::Worker | PhaseKind::Reviewer => {
                let provider = self.providers.resolve(phase.provider.as_deref())?;
                let prompt = self
                    .prompt_loader
                    .compose(&phase.prompt_name, prompt_context)
                    .await?;
                let result = provider.execute(&prompt, work_dir).await?;
                Ok(result.parse_signal()?)
            }
        }
    }
}

/// Wraps an [`ExecutorError`] into the driver-facing [`PipelineError`],
/// naming the phase and attempt per spec §4.2.
pub fn wrap_executor_error(
    phase: &str,
    attempt: u32,
    error: ExecutorError,
) -> PipelineError {
    PipelineError::execution(phase, attempt, error)
}
