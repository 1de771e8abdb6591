//! Shared test doubles for the unit test modules.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use serde_json::Value;

use crate::backend::Backend;
use crate::models::{EntityState, Target};
use crate::template::{RenderContext, TemplateRenderer};

/// A scripted renderer: any string containing `{{` counts as a template and
/// renders to a canned value keyed by the raw template text. Unscripted
/// templates render to themselves.
#[derive(Default)]
pub(crate) struct FakeRenderer {
    responses: HashMap<String, Value>,
    fail_on: Option<String>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, template: &str, rendered: Value) -> Self {
        self.responses.insert(template.to_string(), rendered);
        self
    }

    pub fn failing_on(mut self, template: &str) -> Self {
        self.fail_on = Some(template.to_string());
        self
    }
}

impl TemplateRenderer for FakeRenderer {
    fn has_template(&self, input: &str) -> bool {
        input.contains("{{")
    }

    fn render(&self, input: &str, _ctx: &RenderContext) -> Result<Value> {
        if self.fail_on.as_deref() == Some(input) {
            bail!("scripted failure");
        }
        Ok(self
            .responses
            .get(input)
            .cloned()
            .unwrap_or_else(|| Value::String(input.to_string())))
    }
}

/// One recorded backend service call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub domain: String,
    pub service: String,
    pub data: Value,
    pub target: Option<Target>,
}

/// A backend double that records service calls and serves canned entity
/// states and localizations.
#[derive(Default)]
pub(crate) struct RecordingBackend {
    pub calls: Mutex<Vec<RecordedCall>>,
    pub entities: HashMap<String, EntityState>,
    pub localizations: HashMap<String, String>,
    pub user: Option<String>,
    pub files: HashMap<String, String>,
    pub fail_calls: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity_id: &str, state: EntityState) -> Self {
        self.entities.insert(entity_id.to_string(), state);
        self
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Backend for RecordingBackend {
    async fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: Value,
        target: Option<Target>,
    ) -> Result<()> {
        if self.fail_calls {
            bail!("backend call failed");
        }
        self.calls.lock().unwrap().push(RecordedCall {
            domain: domain.to_string(),
            service: service.to_string(),
            data,
            target,
        });
        Ok(())
    }

    fn entity_state(&self, entity_id: &str) -> Option<EntityState> {
        self.entities.get(entity_id).cloned()
    }

    fn localize(&self, key: &str) -> Option<String> {
        self.localizations.get(key).cloned()
    }

    fn current_user(&self) -> Option<String> {
        self.user.clone()
    }

    async fn fetch_file(&self, path: &str) -> Result<String> {
        match self.files.get(path) {
            Some(contents) => Ok(contents.clone()),
            None => bail!("no such file: {path}"),
        }
    }
}
