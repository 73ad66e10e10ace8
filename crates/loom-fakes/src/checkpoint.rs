// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`CheckpointStore`] fake, keyed by bead ID.

use async_trait::async_trait;
use loom_core::checkpoint::PipelineCheckpoint;
use loom_core::collab::{CheckpointError, CheckpointStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct FakeCheckpointStore {
    state: Arc<Mutex<HashMap<String, PipelineCheckpoint>>>,
}

impl FakeCheckpointStore {
    pub fn new() -> FakeCheckpointStore {
        FakeCheckpointStore::default()
    }

    /// Seed a checkpoint directly, as a test setting up a resumed run would.
    pub fn seed(&self, checkpoint: PipelineCheckpoint) {
        self.state
            .lock()
            .unwrap()
            .insert(checkpoint.bead_id.clone(), checkpoint);
    }

    pub fn contains(&self, bead_id: &str) -> bool {
        self.state.lock().unwrap().contains_key(bead_id)
    }
}

#[async_trait]
impl CheckpointStore for FakeCheckpointStore {
    async fn save(&self, checkpoint: &PipelineCheckpoint) -> Result<(), CheckpointError> {
        self.state
            .lock()
            .unwrap()
            .insert(checkpoint.bead_id.clone(), checkpoint.clone());
        Ok(())
    }

    async fn load(&self, bead_id: &str) -> Result<Option<PipelineCheckpoint>, CheckpointError> {
        Ok(self.state.lock().unwrap().get(bead_id).cloned())
    }

    async fn remove(&self, bead_id: &str) -> Result<(), CheckpointError> {
        self.state.lock().unwrap().remove(bead_id);
        Ok(())
    }
}
