// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker/reviewer retry loop (spec §4.3).
//!
//! A reviewer phase names an earlier worker phase as its `retry_target`
//! (enforced by `loom_core::catalog::validate`). The driver runs that
//! worker once as an ordinary phase step before ever reaching the reviewer;
//! [`run_pair`] takes that result as its starting point and only re-runs
//! the worker — with the reviewer's feedback folded into the next prompt —
//! when the reviewer returns `NEEDS_WORK`, up to the reviewer's
//! `max_retries` attempts. Two reviewers may target the same worker (the
//! `thorough` preset's `execute-review` and `sign-off` both retry
//! `execute`); each call starts from whatever the worker's latest result
//! happens to be.

use crate::executor::{wrap_executor_error, PhaseExecutor};
use loom_core::error::PipelineError;
use loom_core::input::PromptContext;
use loom_core::phase::PhaseDefinition;
use loom_core::result::PhaseResult;
use loom_core::signal::SignalStatus;
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Outcome of running a worker/reviewer pair to completion.
pub struct PairOutcome {
    /// Any additional worker/reviewer attempts beyond the worker result the
    /// caller already had, in execution order.
    pub results: Vec<PhaseResult>,
    pub final_signal: loom_core::signal::Signal,
}

/// Drive `reviewer` against `worker`, starting from `latest_worker_result`
/// (the most recent recorded attempt of `worker`, at whatever attempt
/// number it happens to be).
#[tracing::instrument(skip_all, fields(worker = %worker.name, reviewer = %reviewer.name))]
pub async fn run_pair(
    executor: &PhaseExecutor,
    worker: &PhaseDefinition,
    reviewer: &PhaseDefinition,
    latest_worker_result: &PhaseResult,
    base_context: &PromptContext,
    work_dir: &Path,
    cancel: &CancellationToken,
) -> Result<PairOutcome, PipelineError> {
    let max_retries = reviewer.max_retries.max(1);
    let mut results = Vec::new();
    let mut attempt = latest_worker_result.attempt;

    loop {
        let reviewer_started = Instant::now();
        let reviewer_signal = executor
            .execute_once(reviewer, base_context, work_dir, cancel)
            .await
            .map_err(|e| wrap_executor_error(&reviewer.name, attempt, e))?;

        results.push(PhaseResult::new(
            reviewer.name.as_str(),
            reviewer_signal.clone(),
            attempt,
            reviewer_started.elapsed(),
            chrono::Utc::now(),
        ));

        match reviewer_signal.status {
            SignalStatus::Pass | SignalStatus::Skip => {
                return Ok(PairOutcome {
                    results,
                    final_signal: reviewer_signal,
                });
            }
            SignalStatus::Error => {
                return Err(PipelineError::signal_error(
                    reviewer.name.as_str(),
                    attempt,
                    reviewer_signal,
                ));
            }
            SignalStatus::NeedsWork => {
                if attempt >= max_retries {
                    return Err(PipelineError::retries_exhausted(
                        reviewer.name.as_str(),
                        attempt,
                        max_retries,
                        reviewer_signal,
                    ));
                }
                attempt += 1;
                tracing::info!(attempt, "reviewer requested changes, retrying worker");

                let worker_context = base_context.clone().with_feedback(reviewer_signal.feedback);
                let worker_started = Instant::now();
                let worker_signal = executor
                    .execute_once(worker, &worker_context, work_dir, cancel)
                    .await
                    .map_err(|e| wrap_executor_error(&worker.name, attempt, e))?;

                if worker_signal.status == SignalStatus::Error {
                    return Err(PipelineError::signal_error(
                        worker.name.as_str(),
                        attempt,
                        worker_signal,
                    ));
                }

                results.push(PhaseResult::new(
                    worker.name.as_str(),
                    worker_signal,
                    attempt,
                    worker_started.elapsed(),
                    chrono::Utc::now(),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
