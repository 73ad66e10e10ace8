// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`Provider`] fake: a FIFO queue of canned responses, consumed
//! one per call in the order configured.

use async_trait::async_trait;
use loom_core::collab::{ParseSignalError, Provider, ProviderError, ProviderResult};
use loom_core::signal::Signal;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One recorded `execute` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCall {
    pub prompt: String,
    pub work_dir: PathBuf,
}

#[derive(Default)]
struct State {
    calls: Vec<ProviderCall>,
    queue: VecDeque<Result<Signal, ProviderError>>,
    delay: Option<Duration>,
}

/// A [`Provider`] whose responses are configured ahead of time by the test
/// rather than computed from the prompt — the executor never needs to know
/// it is talking to a fake.
#[derive(Clone)]
pub struct FakeProvider {
    name: Arc<str>,
    state: Arc<Mutex<State>>,
}

impl FakeProvider {
    pub fn new(name: impl Into<String>) -> FakeProvider {
        FakeProvider {
            name: Arc::from(name.into()),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Queue the next `execute` call to return `signal`.
    pub fn push_signal(&self, signal: Signal) {
        self.state.lock().unwrap().queue.push_back(Ok(signal));
    }

    /// Queue the next `execute` call to fail with `error`.
    pub fn push_error(&self, error: ProviderError) {
        self.state.lock().unwrap().queue.push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Make every future `execute` call sleep for `delay` before resolving,
    /// so a test can exercise an executor's timeout path.
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        prompt: &str,
        work_dir: &Path,
    ) -> Result<Box<dyn ProviderResult>, ProviderError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(ProviderCall {
                prompt: prompt.to_string(),
                work_dir: work_dir.to_path_buf(),
            });
            state.delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .state
            .lock()
            .unwrap()
            .queue
            .pop_front()
            .unwrap_or_else(|| Ok(Signal::pass("fake provider default pass")));

        outcome.map(|signal| Box::new(FakeProviderResult(signal)) as Box<dyn ProviderResult>)
    }
}

/// Wraps a pre-baked [`Signal`] — parsing never fails, since the fake never
/// produces text that needs parsing in the first place.
struct FakeProviderResult(Signal);

impl ProviderResult for FakeProviderResult {
    fn parse_signal(&self) -> Result<Signal, ParseSignalError> {
        Ok(self.0.clone())
    }
}
