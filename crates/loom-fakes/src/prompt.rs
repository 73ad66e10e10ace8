// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`PromptLoader`] fake, rendering registered minijinja
//! templates against [`PromptContext`] fields.

use async_trait::async_trait;
use loom_core::collab::{PromptError, PromptLoader};
use loom_core::input::PromptContext;
use minijinja::Environment;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    templates: HashMap<String, String>,
    calls: Vec<(String, PromptContext)>,
}

/// Renders registered templates against [`PromptContext`] fields. Phases
/// with no registered template fall back to a plain summary string so tests
/// that don't care about prompt content don't need to register one.
#[derive(Clone, Default)]
pub struct FakePromptLoader {
    state: Arc<Mutex<State>>,
}

impl FakePromptLoader {
    pub fn new() -> FakePromptLoader {
        FakePromptLoader::default()
    }

    /// Register a minijinja template for `prompt_name`. Available fields:
    /// `bead_id`, `title`, `description`, `sibling_context`, `feedback`.
    pub fn register_template(&self, prompt_name: impl Into<String>, source: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .templates
            .insert(prompt_name.into(), source.into());
    }

    pub fn calls(&self) -> Vec<(String, PromptContext)> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl PromptLoader for FakePromptLoader {
    async fn compose(
        &self,
        prompt_name: &str,
        context: &PromptContext,
    ) -> Result<String, PromptError> {
        let source = {
            let mut state = self.state.lock().unwrap();
            state.calls.push((prompt_name.to_string(), context.clone()));
            state.templates.get(prompt_name).cloned()
        };

        let Some(source) = source else {
            return Ok(format!(
                "{}: {} (attempt feedback: {})",
                prompt_name,
                context.title,
                context.feedback.as_deref().unwrap_or("none")
            ));
        };

        let env = Environment::new();
        let template = env
            .template_from_str(&source)
            .map_err(|e| PromptError::Render(e.to_string()))?;
        let ctx = minijinja::context! {
            bead_id => context.bead_id,
            title => context.title,
            description => context.description,
            sibling_context => context.sibling_context,
            feedback => context.feedback,
        };
        template
            .render(ctx)
            .map_err(|e| PromptError::Render(e.to_string()))
    }
}
