// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! In-memory implementations of every collaborator trait in
//! `loom_core::collab`, used by `loom-engine`'s test suite in place of real
//! provider/gate/worktree/worklog/checkpoint backends.

pub mod checkpoint;
pub mod gate;
pub mod prompt;
pub mod provider;
pub mod status;
pub mod worklog;
pub mod worktree;

pub use checkpoint::FakeCheckpointStore;
pub use gate::{FakeGateRunner, GateCall};
pub use prompt::FakePromptLoader;
pub use provider::{FakeProvider, ProviderCall};
pub use status::FakeStatusSink;
pub use worklog::FakeWorklogManager;
pub use worktree::{FakeWorktreeManager, WorktreeCall};

#[cfg(test)]
mod tests {
    use super::*;
    use loom_core::collab::{GateRunner, Provider, ProviderResult, PromptLoader, WorktreeManager};
    use loom_core::input::PromptContext;
    use loom_core::signal::{Signal, SignalStatus};
    use std::path::Path;

    #[tokio::test]
    async fn fake_provider_replays_queued_signals_in_order() {
        let provider = FakeProvider::new("primary");
        provider.push_signal(Signal::needs_work("try again"));
        provider.push_signal(Signal::pass("looks good"));

        let first = provider
            .execute("do the thing", Path::new("/work"))
            .await
            .unwrap();
        let second = provider
            .execute("do the thing again", Path::new("/work"))
            .await
            .unwrap();

        assert_eq!(
            first.parse_signal().unwrap().status,
            SignalStatus::NeedsWork
        );
        assert_eq!(second.parse_signal().unwrap().status, SignalStatus::Pass);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn fake_provider_defaults_to_pass_when_queue_empty() {
        let provider = FakeProvider::new("primary");
        let result = provider.execute("prompt", Path::new("/work")).await.unwrap();
        assert_eq!(result.parse_signal().unwrap().status, SignalStatus::Pass);
    }

    #[tokio::test]
    async fn fake_gate_runner_keys_responses_by_command() {
        let gate = FakeGateRunner::new();
        gate.set_response("cargo test", Signal::pass("tests green"));
        gate.set_response("cargo clippy", Signal::needs_work("warnings found"));

        let test_signal = gate.run("cargo test", Path::new("/work")).await.unwrap();
        let clippy_signal = gate.run("cargo clippy", Path::new("/work")).await.unwrap();

        assert_eq!(test_signal.status, SignalStatus::Pass);
        assert_eq!(clippy_signal.status, SignalStatus::NeedsWork);
        assert_eq!(gate.calls().len(), 2);
    }

    #[tokio::test]
    async fn fake_prompt_loader_renders_registered_template() {
        let loader = FakePromptLoader::new();
        loader.register_template("execute", "Implement: {{ title }}");

        let context = PromptContext {
            bead_id: "bead-1".to_string(),
            title: "Add auth".to_string(),
            ..PromptContext::default()
        };

        let rendered = loader.compose("execute", &context).await.unwrap();
        assert_eq!(rendered, "Implement: Add auth");
    }

    #[tokio::test]
    async fn fake_prompt_loader_falls_back_without_registered_template() {
        let loader = FakePromptLoader::new();
        let context = PromptContext {
            title: "Add auth".to_string(),
            ..PromptContext::default()
        };
        let rendered = loader.compose("unregistered", &context).await.unwrap();
        assert!(rendered.contains("Add auth"));
    }

    #[tokio::test]
    async fn fake_worktree_manager_tracks_create_and_remove() {
        let manager = FakeWorktreeManager::new("/tmp/root");
        manager.create("bead-1", "main").await.unwrap();
        assert!(manager.exists("bead-1"));

        manager.remove("bead-1", true).await.unwrap();
        assert!(!manager.exists("bead-1"));
    }

    #[tokio::test]
    async fn fake_worktree_manager_remove_unknown_id_errors() {
        let manager = FakeWorktreeManager::new("/tmp/root");
        let result = manager.remove("missing", false).await;
        assert!(result.is_err());
    }
}
