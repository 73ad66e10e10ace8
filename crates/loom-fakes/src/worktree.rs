// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`WorktreeManager`] fake: tracks create/remove calls without
//! touching the filesystem or a real git repository.

use async_trait::async_trait;
use loom_core::collab::{WorktreeError, WorktreeManager};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorktreeCall {
    Create { id: String, base_branch: String },
    Remove { id: String, delete_branch: bool },
}

#[derive(Default)]
struct State {
    calls: Vec<WorktreeCall>,
    existing: HashMap<String, PathBuf>,
    root: PathBuf,
    fail_create: Option<String>,
}

#[derive(Clone)]
pub struct FakeWorktreeManager {
    state: Arc<Mutex<State>>,
}

impl Default for FakeWorktreeManager {
    fn default() -> Self {
        FakeWorktreeManager::new(PathBuf::from("/tmp/loom-fake-worktrees"))
    }
}

impl FakeWorktreeManager {
    pub fn new(root: impl Into<PathBuf>) -> FakeWorktreeManager {
        FakeWorktreeManager {
            state: Arc::new(Mutex::new(State {
                root: root.into(),
                ..State::default()
            })),
        }
    }

    pub fn calls(&self) -> Vec<WorktreeCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.state.lock().unwrap().existing.contains_key(id)
    }

    /// Configure the next `create` call for `id` to fail.
    pub fn fail_create_for(&self, id: impl Into<String>) {
        self.state.lock().unwrap().fail_create = Some(id.into());
    }
}

#[async_trait]
impl WorktreeManager for FakeWorktreeManager {
    async fn create(&self, id: &str, base_branch: &str) -> Result<(), WorktreeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(WorktreeCall::Create {
            id: id.to_string(),
            base_branch: base_branch.to_string(),
        });

        if state.fail_create.as_deref() == Some(id) {
            return Err(WorktreeError::CreateFailed {
                id: id.to_string(),
                reason: "configured to fail".to_string(),
            });
        }

        let path = state.root.join(id);
        state.existing.insert(id.to_string(), path);
        Ok(())
    }

    async fn remove(&self, id: &str, delete_branch: bool) -> Result<(), WorktreeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(WorktreeCall::Remove {
            id: id.to_string(),
            delete_branch,
        });

        if state.existing.remove(id).is_none() {
            return Err(WorktreeError::RemoveFailed {
                id: id.to_string(),
                reason: "no such worktree".to_string(),
            });
        }
        Ok(())
    }

    fn path(&self, id: &str) -> PathBuf {
        let state = self.state.lock().unwrap();
        state
            .existing
            .get(id)
            .cloned()
            .unwrap_or_else(|| state.root.join(id))
    }
}
