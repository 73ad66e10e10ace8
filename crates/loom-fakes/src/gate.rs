// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`GateRunner`] fake: per-command canned signals.

use async_trait::async_trait;
use loom_core::collab::{GateError, GateRunner};
use loom_core::signal::Signal;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct GateCall {
    pub command: String,
    pub work_dir: PathBuf,
}

#[derive(Default)]
struct State {
    calls: Vec<GateCall>,
    responses: HashMap<String, Result<Signal, GateError>>,
    default_response: Option<Result<Signal, GateError>>,
}

#[derive(Clone, Default)]
pub struct FakeGateRunner {
    state: Arc<Mutex<State>>,
}

impl FakeGateRunner {
    pub fn new() -> FakeGateRunner {
        FakeGateRunner::default()
    }

    /// Configure the signal returned the next time `command` is run.
    pub fn set_response(&self, command: impl Into<String>, signal: Signal) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(command.into(), Ok(signal));
    }

    /// Configure `command` to fail with `error`.
    pub fn set_error(&self, command: impl Into<String>, error: GateError) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(command.into(), Err(error));
    }

    /// Configure the response returned for any command with no specific
    /// entry (defaults to `pass` otherwise).
    pub fn set_default(&self, signal: Signal) {
        self.state.lock().unwrap().default_response = Some(Ok(signal));
    }

    pub fn calls(&self) -> Vec<GateCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl GateRunner for FakeGateRunner {
    async fn run(&self, command: &str, work_dir: &Path) -> Result<Signal, GateError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GateCall {
            command: command.to_string(),
            work_dir: work_dir.to_path_buf(),
        });

        if let Some(response) = state.responses.get(command) {
            return response.clone();
        }
        match &state.default_response {
            Some(response) => response.clone(),
            None => Ok(Signal::pass("fake gate default pass")),
        }
    }
}
