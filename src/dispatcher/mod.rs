//! Action dispatch.
//!
//! Maps a classified gesture slot to the element's configured action and
//! executes it: backend service calls for the device-control kinds, host
//! events for the local kinds, with an optional confirmation round trip in
//! front. Dispatch is async at exactly two points: awaiting the
//! confirmation answer and awaiting backend call completion.

mod commands;
mod confirm;

pub use commands::{key_call, source_call, toggle_call, BackendCall};

use anyhow::Result;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::backend::Backend;
use crate::models::{
    Action, ActionKind, ActionSlot, ConfirmSignal, ElementConfig, Haptic, HostEvent, Target,
    TargetConfig,
};
use crate::template::{deep_render_action, RenderContext, TemplateRenderer};

/// Localization key for the default confirmation prompt.
const CONFIRMATION_TEXT_KEY: &str = "ui.dialogs.generic.default_confirmation_text";

/// Executes resolved actions against one backend and one host event
/// channel.
///
/// Backend call errors propagate to the caller; the caller must reset its
/// gesture classifier before surfacing them so a failed call never leaves
/// a stuck press behind.
pub struct Dispatcher<'a, B: Backend, R: TemplateRenderer> {
    backend: &'a B,
    renderer: &'a R,
    events: mpsc::UnboundedSender<HostEvent>,
    confirmations: mpsc::Receiver<ConfirmSignal>,
}

impl<'a, B: Backend, R: TemplateRenderer> Dispatcher<'a, B, R> {
    /// A dispatcher emitting host events on `events` and reading
    /// confirmation answers from `confirmations`.
    pub fn new(
        backend: &'a B,
        renderer: &'a R,
        events: mpsc::UnboundedSender<HostEvent>,
        confirmations: mpsc::Receiver<ConfirmSignal>,
    ) -> Self {
        Self {
            backend,
            renderer,
            events,
            confirmations,
        }
    }

    /// Dispatch the action bound to `slot` on `element`.
    ///
    /// Resolves the slot through its fallback chain, deep-renders the
    /// action against `ctx`, runs the confirmation gate, then routes by
    /// kind. Local problems (missing fields, denied confirmations) notify
    /// the host and return `Ok`; only backend call failures return `Err`.
    pub async fn dispatch(
        &mut self,
        slot: ActionSlot,
        element: &ElementConfig,
        ctx: &RenderContext,
    ) -> Result<()> {
        let Some(action) = element.resolve_slot(slot) else {
            // Nothing ran; let the host reset any optimistic UI state.
            self.emit(HostEvent::ConfirmationFailed);
            return Ok(());
        };
        if action.action == ActionKind::None {
            self.emit(HostEvent::ConfirmationFailed);
            return Ok(());
        }
        if action.action == ActionKind::Repeat {
            // Repeats are expanded by the gesture classifier, never run here.
            return Ok(());
        }
        let action = deep_render_action(self.renderer, action, ctx);

        if let Some(confirmation) = &action.confirmation {
            if confirmation.required_for(self.backend.current_user().as_deref()) {
                let text = self.confirmation_text(&action);
                self.emit(HostEvent::ConfirmationRequest { text });
                if !confirm::await_confirmation(&mut self.confirmations).await {
                    debug!("confirmation denied for {slot}");
                    self.emit(HostEvent::ConfirmationFailed);
                    return Ok(());
                }
            }
        }

        let haptics = element.haptics.unwrap_or(true);
        match action.action {
            ActionKind::Key => self.dispatch_key(slot, element, &action).await?,
            ActionKind::Source => self.dispatch_source(element, &action).await?,
            ActionKind::PerformAction => self.dispatch_perform(element, &action).await?,
            ActionKind::Toggle => self.dispatch_toggle(element, &action).await?,
            ActionKind::Navigate => self.dispatch_navigate(&action),
            ActionKind::Url => self.dispatch_url(element, &action),
            ActionKind::MoreInfo => self.dispatch_more_info(element, &action),
            ActionKind::Assist => self.emit(HostEvent::Assist {
                pipeline_id: action.pipeline_id.clone(),
                start_listening: action.start_listening,
            }),
            ActionKind::Keyboard | ActionKind::Textbox | ActionKind::Search => {
                if !self.dispatch_dialog(element, &action) {
                    return Ok(());
                }
            }
            ActionKind::FireDomEvent => self.emit(HostEvent::DomEvent {
                event_type: action
                    .event_type
                    .clone()
                    .unwrap_or_else(|| "ll-custom".to_string()),
                action: Box::new(action.clone()),
            }),
            ActionKind::Eval => match &action.eval {
                Some(code) => self.emit(HostEvent::Eval { code: code.clone() }),
                None => {
                    self.fail(element, "eval action has no script text");
                    return Ok(());
                }
            },
            ActionKind::None | ActionKind::Repeat => unreachable!("filtered above"),
        }

        if haptics {
            let pulse = if slot.is_hold() {
                Haptic::Medium
            } else {
                Haptic::Light
            };
            self.emit(HostEvent::Haptic(pulse));
        }
        Ok(())
    }

    async fn dispatch_key(
        &mut self,
        slot: ActionSlot,
        element: &ElementConfig,
        action: &Action,
    ) -> Result<()> {
        if action.key.is_none() {
            self.fail(element, "key action has no key");
            return Ok(());
        }
        // A hold gesture with no explicit hold action falls back onto the
        // tap slot's key and sends a one-second hold to the backend instead.
        let hold = slot.is_hold()
            && element
                .slot(ActionSlot::Hold)
                .is_none_or(|configured| configured.action == ActionKind::None);
        if let Some(call) = commands::key_call(action, hold) {
            self.call(call).await?;
        }
        Ok(())
    }

    async fn dispatch_source(&mut self, element: &ElementConfig, action: &Action) -> Result<()> {
        if action.source.is_none() {
            self.fail(element, "source action has no source");
            return Ok(());
        }
        if let Some(call) = commands::source_call(action) {
            self.call(call).await?;
        }
        Ok(())
    }

    async fn dispatch_perform(&mut self, element: &ElementConfig, action: &Action) -> Result<()> {
        let Some(service) = action.perform_action.as_deref() else {
            self.fail(element, "perform-action has no action name");
            return Ok(());
        };
        let Some((domain, name)) = service.split_once('.') else {
            self.fail(element, "perform-action is not of the form domain.service");
            return Ok(());
        };
        let target = match &action.target {
            Some(TargetConfig::Structured(target)) => Some(target.clone()),
            Some(TargetConfig::Template(_)) => {
                // deep_render_action already warned about the parse failure.
                self.fail(element, "target template did not render to a mapping");
                return Ok(());
            }
            None => None,
        };
        let data = action
            .data
            .clone()
            .unwrap_or_else(|| Value::Object(Map::new()));
        self.call(BackendCall {
            domain: domain.to_string(),
            service: name.to_string(),
            data,
            target,
        })
        .await
    }

    async fn dispatch_toggle(&mut self, element: &ElementConfig, action: &Action) -> Result<()> {
        let target = action.target.as_ref().and_then(TargetConfig::structured);
        let entity_ids: Vec<String> = target
            .and_then(|target| target.entity_id.as_ref())
            .map(|ids| ids.iter().into_iter().map(str::to_string).collect())
            .unwrap_or_else(|| element.entity_id.iter().cloned().collect());
        if entity_ids.is_empty() {
            // Device/area/label targets carry no entity to inspect; let the
            // backend pick the verb per member.
            if let Some(target) = target.filter(|target| !target.is_empty()) {
                return self.toggle_by_target(action, target.clone()).await;
            }
            self.fail(element, "toggle action has no target entity");
            return Ok(());
        }
        for entity_id in entity_ids {
            let state = self
                .backend
                .entity_state(&entity_id)
                .map(|entity| entity.state)
                .unwrap_or_default();
            let mut call = commands::toggle_call(&entity_id, &state);
            if let (Value::Object(merged), Some(Value::Object(extra))) =
                (&mut call.data, &action.data)
            {
                merged.extend(extra.clone());
            }
            self.call(call).await?;
        }
        Ok(())
    }

    /// Toggle a target block with no entities in it via the backend's
    /// generic toggle, which resolves the verb per member itself.
    async fn toggle_by_target(&self, action: &Action, target: Target) -> Result<()> {
        let data = action
            .data
            .clone()
            .unwrap_or_else(|| Value::Object(Map::new()));
        self.call(BackendCall {
            domain: "homeassistant".to_string(),
            service: "toggle".to_string(),
            data,
            target: Some(target),
        })
        .await
    }

    /// Show a keyboard-family dialog when the action's platform has one.
    /// Returns whether the dialog was shown.
    fn dispatch_dialog(&self, element: &ElementConfig, action: &Action) -> bool {
        let platform = action.platform.unwrap_or_default();
        let supported = match action.action {
            ActionKind::Search => platform.supports_search(),
            _ => platform.supports_keyboard(),
        };
        if !supported {
            let message = format!("{platform} does not support {}", action.action.as_str());
            self.fail(element, &message);
            return false;
        }
        self.emit(HostEvent::DialogShow(action.clone()));
        true
    }

    fn dispatch_navigate(&self, action: &Action) {
        let Some(path) = action.navigation_path.as_deref() else {
            error!("navigate action has no navigation_path");
            return;
        };
        // Double slashes can smuggle a protocol-relative URL into the
        // dashboard router; refuse them.
        if path.contains("//") {
            error!("refusing to navigate to unsafe path {path:?}");
            return;
        }
        self.emit(HostEvent::LocationChanged {
            path: path.to_string(),
            replace: action.navigation_replace.unwrap_or(false),
        });
    }

    fn dispatch_url(&self, element: &ElementConfig, action: &Action) {
        let Some(url) = action.url_path.as_deref() else {
            self.fail(element, "url action has no url_path");
            return;
        };
        let url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{url}")
        };
        self.emit(HostEvent::OpenUrl { url });
    }

    fn dispatch_more_info(&self, element: &ElementConfig, action: &Action) {
        let entity_id = action
            .target
            .as_ref()
            .and_then(TargetConfig::structured)
            .and_then(|target| target.entity_id.as_ref())
            .and_then(|ids| ids.first().map(str::to_string))
            .or_else(|| element.entity_id.clone());
        match entity_id {
            Some(entity_id) => self.emit(HostEvent::MoreInfo { entity_id }),
            None => self.fail(element, "more-info action has no entity"),
        }
    }

    /// Prompt text for a confirmation: explicit text, else the host's
    /// localized default, else a generic fallback, both naming the action.
    fn confirmation_text(&self, action: &Action) -> String {
        if let Some(text) = action.confirmation.as_ref().and_then(|c| c.text()) {
            return text.to_string();
        }
        let name = action
            .perform_action
            .as_deref()
            .or(action.key.as_deref())
            .or(action.source.as_deref())
            .unwrap_or_else(|| action.action.as_str());
        match self.backend.localize(CONFIRMATION_TEXT_KEY) {
            Some(template) => template.replace("{name}", name),
            None => format!("Are you sure you want to run {name}?"),
        }
    }

    async fn call(&self, call: BackendCall) -> Result<()> {
        self.backend
            .call_service(&call.domain, &call.service, call.data, call.target)
            .await
    }

    /// A local failure: transient notification plus a failure pulse, never
    /// an error.
    fn fail(&self, element: &ElementConfig, message: &str) {
        error!("{message}");
        self.emit(HostEvent::Notification {
            message: message.to_string(),
        });
        if element.haptics.unwrap_or(true) {
            self.emit(HostEvent::Haptic(Haptic::Failure));
        }
    }

    fn emit(&self, event: HostEvent) {
        // The host dropping its receiver just means nobody is listening.
        let _ = self.events.send(event);
    }
}
