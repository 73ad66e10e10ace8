// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`WorklogManager`] fake: records entries per working directory.

use async_trait::async_trait;
use loom_core::collab::{BeadMeta, WorklogEntry, WorklogError, WorklogManager};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    opened: HashMap<PathBuf, BeadMeta>,
    entries: HashMap<PathBuf, Vec<WorklogEntry>>,
    archived: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeWorklogManager {
    state: Arc<Mutex<State>>,
}

impl FakeWorklogManager {
    pub fn new() -> FakeWorklogManager {
        FakeWorklogManager::default()
    }

    pub fn entries_for(&self, work_dir: &Path) -> Vec<WorklogEntry> {
        self.state
            .lock()
            .unwrap()
            .entries
            .get(work_dir)
            .cloned()
            .unwrap_or_default()
    }

    pub fn archived_bead_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().archived.clone()
    }
}

#[async_trait]
impl WorklogManager for FakeWorklogManager {
    async fn create(&self, work_dir: &Path, bead: &BeadMeta) -> Result<(), WorklogError> {
        let mut state = self.state.lock().unwrap();
        state.opened.insert(work_dir.to_path_buf(), bead.clone());
        state.entries.entry(work_dir.to_path_buf()).or_default();
        Ok(())
    }

    async fn append_phase_entry(
        &self,
        work_dir: &Path,
        entry: &WorklogEntry,
    ) -> Result<(), WorklogError> {
        let mut state = self.state.lock().unwrap();
        if !state.opened.contains_key(work_dir) {
            return Err(WorklogError::AppendFailed(format!(
                "no worklog opened for {}",
                work_dir.display()
            )));
        }
        state
            .entries
            .entry(work_dir.to_path_buf())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn archive(&self, work_dir: &Path, bead_id: &str) -> Result<(), WorklogError> {
        let mut state = self.state.lock().unwrap();
        if state.opened.remove(work_dir).is_none() {
            return Err(WorklogError::ArchiveFailed(format!(
                "no worklog opened for {}",
                work_dir.display()
            )));
        }
        state.archived.push(bead_id.to_string());
        Ok(())
    }
}
