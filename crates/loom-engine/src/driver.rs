// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level pipeline state machine (spec §4.4–§4.6).
//!
//! [`PipelineDriver`] owns the phase list and wires together the executor,
//! the retry coordinator and the status reporter. It is the only thing a
//! caller constructs directly; everything else in this crate is a
//! collaborator it drives.

use crate::executor::{wrap_executor_error, PhaseExecutor, ProviderRegistry};
use crate::report::StatusReporter;
use crate::retry;
use loom_core::checkpoint::PipelineCheckpoint;
use loom_core::collab::{
    BeadMeta, CheckpointStore, GateRunner, PromptLoader, StatusSink, WorklogEntry, WorklogManager,
    WorktreeManager,
};
use loom_core::error::PipelineError;
use loom_core::input::{validate_bead_id, PipelineInput, PipelineOutput, PromptContext};
use loom_core::phase::{PhaseDefinition, PhaseKind};
use loom_core::result::PhaseResult;
use loom_core::signal::{Signal, SignalStatus};
use loom_core::status::StatusState;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Every collaborator a driver needs, bundled so a caller builds one struct
/// instead of threading five `Arc`s through the constructor.
pub struct Collaborators {
    pub providers: ProviderRegistry,
    pub gate_runner: Arc<dyn GateRunner>,
    pub prompt_loader: Arc<dyn PromptLoader>,
    pub worktree_manager: Arc<dyn WorktreeManager>,
    pub worklog_manager: Arc<dyn WorklogManager>,
    pub checkpoint_store: Arc<dyn CheckpointStore>,
    pub status_sink: Arc<dyn StatusSink>,
}

/// Runs one phase list against one bead, start to finish.
pub struct PipelineDriver {
    phases: Vec<PhaseDefinition>,
    collaborators: Collaborators,
}

impl PipelineDriver {
    pub fn new(phases: Vec<PhaseDefinition>, collaborators: Collaborators) -> PipelineDriver {
        PipelineDriver {
            phases,
            collaborators,
        }
    }

    /// Run the pipeline to completion, to a hard failure, or to a pause.
    ///
    /// `cancel` doubles as two signals: it is checked between phases (the
    /// pause predicate) and raced against the in-flight collaborator call
    /// inside each phase attempt (mid-phase cancellation). Cancelling while
    /// a phase is running aborts that attempt rather than waiting for it to
    /// finish before pausing; see SPEC_FULL.md's driver section for why this
    /// is a deliberate single-token simplification rather than the two
    /// independent signals described in phase execution.
    #[tracing::instrument(skip_all, fields(bead_id = %input.bead_id))]
    pub async fn run(
        &self,
        input: PipelineInput,
        cancel: CancellationToken,
    ) -> Result<PipelineOutput, PipelineError> {
        validate_bead_id(&input.bead_id).map_err(PipelineError::setup)?;

        let base_branch = input
            .base_branch
            .clone()
            .unwrap_or_else(|| "main".to_string());

        self.collaborators
            .worktree_manager
            .create(&input.bead_id, &base_branch)
            .await
            .map_err(PipelineError::setup)?;
        let work_dir = self.collaborators.worktree_manager.path(&input.bead_id);

        self.collaborators
            .worklog_manager
            .create(
                &work_dir,
                &BeadMeta {
                    bead_id: input.bead_id.clone(),
                    title: input.title.clone(),
                },
            )
            .await
            .map_err(PipelineError::setup)?;

        let checkpoint = self
            .collaborators
            .checkpoint_store
            .load(&input.bead_id)
            .await
            .map_err(PipelineError::setup)?;

        let mut already_done: HashSet<String> = input.skip_phases.iter().cloned().collect();
        let mut known_results: HashMap<String, PhaseResult> = HashMap::new();
        if let Some(checkpoint) = &checkpoint {
            for name in checkpoint.completed_phase_names() {
                already_done.insert(name.to_string());
            }
            for result in &checkpoint.phase_results {
                known_results.insert(result.phase_name.clone(), result.clone());
            }
        }

        let executor = PhaseExecutor::new(
            self.collaborators.providers.clone(),
            self.collaborators.gate_runner.clone(),
            self.collaborators.prompt_loader.clone(),
        );
        let reporter = StatusReporter::new(
            self.collaborators.status_sink.clone(),
            input.bead_id.clone(),
            self.phases.len(),
        );
        let base_context = PromptContext::from_input(&input);

        let mut phase_results: Vec<PhaseResult> = Vec::new();
        let run_result = self
            .run_phases(
                &executor,
                &reporter,
                &base_context,
                &work_dir,
                &input.bead_id,
                &mut already_done,
                &mut known_results,
                &mut phase_results,
                &cancel,
            )
            .await;

        match &run_result {
            Ok(()) => {
                if let Err(e) = self
                    .collaborators
                    .checkpoint_store
                    .remove(&input.bead_id)
                    .await
                {
                    tracing::warn!(error = %e, "failed to remove checkpoint after success");
                }
                self.collaborators
                    .worklog_manager
                    .archive(&work_dir, &input.bead_id)
                    .await
                    .map_err(PipelineError::teardown)?;
            }
            Err(_) => {
                self.save_checkpoint(&input.bead_id, &phase_results).await;
            }
        }

        run_result.map(|()| PipelineOutput {
            phase_results,
            completed: true,
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_phases(
        &self,
        executor: &PhaseExecutor,
        reporter: &StatusReporter,
        base_context: &PromptContext,
        work_dir: &Path,
        bead_id: &str,
        already_done: &mut HashSet<String>,
        known_results: &mut HashMap<String, PhaseResult>,
        phase_results: &mut Vec<PhaseResult>,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        for (index, phase) in self.phases.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(PipelineError::paused());
            }

            if already_done.contains(&phase.name) {
                known_results
                    .entry(phase.name.clone())
                    .or_insert_with(|| PhaseResult::skipped(&phase.name, "skipped by caller"));
                continue;
            }

            let position = index + 1;

            let runs = phase
                .condition
                .evaluate(work_dir)
                .map_err(|e| PipelineError::execution(phase.name.as_str(), 1, e))?;
            if !runs {
                let result = PhaseResult::skipped(&phase.name, "condition not met");
                reporter
                    .terminal(
                        &phase.name,
                        position,
                        StatusState::Skipped,
                        1,
                        phase.max_retries,
                        result.signal.clone(),
                        result.duration,
                    )
                    .await;
                self.record(work_dir, result, known_results, phase_results)
                    .await?;
                continue;
            }

            match phase.kind {
                PhaseKind::Gate => {
                    self.run_gate(
                        phase,
                        executor,
                        reporter,
                        base_context,
                        work_dir,
                        position,
                        known_results,
                        phase_results,
                        cancel,
                    )
                    .await?;
                }
                PhaseKind::Worker => {
                    self.run_worker(
                        phase,
                        executor,
                        reporter,
                        base_context,
                        work_dir,
                        position,
                        known_results,
                        phase_results,
                        cancel,
                    )
                    .await?;
                }
                PhaseKind::Reviewer => {
                    self.run_reviewer(
                        phase,
                        executor,
                        reporter,
                        base_context,
                        work_dir,
                        position,
                        known_results,
                        phase_results,
                        cancel,
                    )
                    .await?;
                }
            }

            self.save_checkpoint(bead_id, phase_results).await;
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_gate(
        &self,
        phase: &PhaseDefinition,
        executor: &PhaseExecutor,
        reporter: &StatusReporter,
        base_context: &PromptContext,
        work_dir: &Path,
        position: usize,
        known_results: &mut HashMap<String, PhaseResult>,
        phase_results: &mut Vec<PhaseResult>,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        reporter.running(&phase.name, position, 1, phase.max_retries).await;
        let started = Instant::now();
        let outcome = executor
            .execute_once(phase, base_context, work_dir, cancel)
            .await;

        let signal = match outcome {
            Ok(signal) => signal,
            Err(e) if phase.optional => {
                tracing::warn!(phase = %phase.name, error = %e, "optional gate failed, continuing");
                let signal = Signal::error(e.to_string());
                reporter
                    .terminal(
                        &phase.name,
                        position,
                        StatusState::Skipped,
                        1,
                        phase.max_retries,
                        signal.clone(),
                        started.elapsed(),
                    )
                    .await;
                let result = PhaseResult::new(phase.name.as_str(), signal, 1, started.elapsed(), chrono::Utc::now());
                self.record(work_dir, result, known_results, phase_results)
                    .await?;
                return Ok(());
            }
            Err(e) => return Err(wrap_executor_error(&phase.name, 1, e)),
        };

        let is_failure = matches!(signal.status, SignalStatus::Error | SignalStatus::NeedsWork);
        let status = if is_failure && phase.optional {
            StatusState::Skipped
        } else {
            status_state_for(&signal)
        };
        reporter
            .terminal(
                &phase.name,
                position,
                status,
                1,
                phase.max_retries,
                signal.clone(),
                started.elapsed(),
            )
            .await;

        let result = PhaseResult::new(
            phase.name.as_str(),
            signal.clone(),
            1,
            started.elapsed(),
            chrono::Utc::now(),
        );
        self.record(work_dir, result, known_results, phase_results)
            .await?;

        if is_failure && !phase.optional {
            return Err(PipelineError::signal_error(phase.name.as_str(), 1, signal));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_worker(
        &self,
        phase: &PhaseDefinition,
        executor: &PhaseExecutor,
        reporter: &StatusReporter,
        base_context: &PromptContext,
        work_dir: &Path,
        position: usize,
        known_results: &mut HashMap<String, PhaseResult>,
        phase_results: &mut Vec<PhaseResult>,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        reporter.running(&phase.name, position, 1, phase.max_retries).await;
        let started = Instant::now();
        let signal = executor
            .execute_once(phase, base_context, work_dir, cancel)
            .await
            .map_err(|e| wrap_executor_error(&phase.name, 1, e))?;

        let status = status_state_for(&signal);
        reporter
            .terminal(
                &phase.name,
                position,
                status,
                1,
                phase.max_retries,
                signal.clone(),
                started.elapsed(),
            )
            .await;

        if signal.status == SignalStatus::Error {
            return Err(PipelineError::signal_error(phase.name.as_str(), 1, signal));
        }

        let result = PhaseResult::new(phase.name.as_str(), signal, 1, started.elapsed(), chrono::Utc::now());
        self.record(work_dir, result, known_results, phase_results)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_reviewer(
        &self,
        phase: &PhaseDefinition,
        executor: &PhaseExecutor,
        reporter: &StatusReporter,
        base_context: &PromptContext,
        work_dir: &Path,
        position: usize,
        known_results: &mut HashMap<String, PhaseResult>,
        phase_results: &mut Vec<PhaseResult>,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        let target_name = phase
            .retry_target
            .as_deref()
            .expect("reviewer phases always carry a retry_target (enforced at load time)");
        let worker = self
            .phases
            .iter()
            .find(|p| p.name == target_name)
            .expect("retry_target names a phase in this same list (enforced at load time)");

        let latest_worker_result = known_results
            .get(target_name)
            .cloned()
            .unwrap_or_else(|| PhaseResult::skipped(target_name, "no prior attempt on record"));

        reporter
            .running(
                &phase.name,
                position,
                latest_worker_result.attempt,
                phase.max_retries,
            )
            .await;
        let started = Instant::now();

        let outcome = retry::run_pair(
            executor,
            worker,
            phase,
            &latest_worker_result,
            base_context,
            work_dir,
            cancel,
        )
        .await;

        let outcome = outcome?;

        let final_attempt = outcome
            .results
            .last()
            .map(|r| r.attempt)
            .unwrap_or(latest_worker_result.attempt);
        reporter
            .terminal(
                &phase.name,
                position,
                status_state_for(&outcome.final_signal),
                final_attempt,
                phase.max_retries,
                outcome.final_signal.clone(),
                started.elapsed(),
            )
            .await;

        for result in outcome.results {
            self.record(work_dir, result, known_results, phase_results)
                .await?;
        }
        Ok(())
    }

    async fn record(
        &self,
        work_dir: &Path,
        result: PhaseResult,
        known_results: &mut HashMap<String, PhaseResult>,
        phase_results: &mut Vec<PhaseResult>,
    ) -> Result<(), PipelineError> {
        self.collaborators
            .worklog_manager
            .append_phase_entry(
                work_dir,
                &WorklogEntry {
                    phase: result.phase_name.clone(),
                    attempt: result.attempt,
                    summary: result.signal.summary.clone(),
                },
            )
            .await
            .map_err(|e| PipelineError::execution(result.phase_name.as_str(), result.attempt, e))?;

        known_results.insert(result.phase_name.clone(), result.clone());
        phase_results.push(result);
        Ok(())
    }

    async fn save_checkpoint(&self, bead_id: &str, phase_results: &[PhaseResult]) {
        let checkpoint = PipelineCheckpoint::new(bead_id, phase_results.to_vec());
        if let Err(e) = self.collaborators.checkpoint_store.save(&checkpoint).await {
            tracing::warn!(error = %e, "failed to save checkpoint");
        }
    }
}

fn status_state_for(signal: &Signal) -> StatusState {
    match signal.status {
        SignalStatus::Pass => StatusState::Passed,
        SignalStatus::Skip => StatusState::Skipped,
        SignalStatus::NeedsWork => StatusState::Failed,
        SignalStatus::Error => StatusState::Error,
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
