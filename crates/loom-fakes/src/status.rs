// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`StatusSink`] fake: records every update for assertions.

use async_trait::async_trait;
use loom_core::collab::StatusSink;
use loom_core::status::StatusUpdate;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct FakeStatusSink {
    updates: Arc<Mutex<Vec<StatusUpdate>>>,
}

impl FakeStatusSink {
    pub fn new() -> FakeStatusSink {
        FakeStatusSink::default()
    }

    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<StatusUpdate> {
        self.updates.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl StatusSink for FakeStatusSink {
    async fn send(&self, update: StatusUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}
