//! End-to-end tests for the gesture-to-backend dispatch flow.
//!
//! Drives the full pipeline the way a host would: card config through the
//! resolver, raw pointer events through the classifier, and the resulting
//! gesture events through the dispatcher against a recording backend.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use serde_json::Value;
use tokio::sync::mpsc;

use remote_card_core::backend::Backend;
use remote_card_core::config::CardConfig;
use remote_card_core::constants::HOLD_TIME_MS;
use remote_card_core::dispatcher::Dispatcher;
use remote_card_core::gesture::{GestureClassifier, GestureConfig};
use remote_card_core::models::{
    Action, ActionKind, ActionSlot, ConfirmSignal, ElementConfig, ElementType, EntityState,
    HostEvent, Platform, Target,
};
use remote_card_core::resolver::Resolver;
use remote_card_core::template::{PassthroughRenderer, RenderContext};

/// Subscribe tracing to the test writer so dispatch warnings show up in
/// failing test output. Later calls are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A backend double recording every service call.
#[derive(Default)]
struct RecordingBackend {
    calls: Mutex<Vec<(String, String, Value)>>,
    entities: HashMap<String, EntityState>,
}

impl RecordingBackend {
    fn calls(&self) -> Vec<(String, String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Backend for RecordingBackend {
    async fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: Value,
        _target: Option<Target>,
    ) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((domain.to_string(), service.to_string(), data));
        Ok(())
    }

    fn entity_state(&self, entity_id: &str) -> Option<EntityState> {
        self.entities.get(entity_id).cloned()
    }

    fn localize(&self, _key: &str) -> Option<String> {
        None
    }

    fn current_user(&self) -> Option<String> {
        None
    }

    async fn fetch_file(&self, path: &str) -> Result<String> {
        bail!("no such file: {path}")
    }
}

fn card() -> CardConfig {
    CardConfig {
        platform: Some(Platform::AndroidTv),
        remote_id: Some("remote.living_room_tv".to_string()),
        media_player_id: Some("media_player.living_room_tv".to_string()),
        ..CardConfig::default()
    }
}

/// Run one press-release cycle through the classifier and dispatch every
/// resulting gesture event.
async fn press_and_dispatch(
    element: &ElementConfig,
    dispatcher: &mut Dispatcher<'_, RecordingBackend, PassthroughRenderer>,
    held_for_ms: u64,
) {
    let mut classifier = GestureClassifier::new(GestureConfig::from_element(element));
    let mut events = classifier.pointer_down(50.0, 50.0, 0);
    events.extend(classifier.tick(held_for_ms));
    events.extend(classifier.pointer_up(held_for_ms));
    while let Some(deadline) = classifier.next_deadline() {
        events.extend(classifier.tick(deadline));
    }
    for event in events {
        dispatcher
            .dispatch(event.slot, element, &event.snapshot.render_context())
            .await
            .unwrap();
    }
}

// ============================================================================
// Catalog-default elements end to end
// ============================================================================

#[tokio::test]
async fn test_tap_on_catalog_button_reaches_the_backend() {
    init_tracing();
    let card = card();
    let renderer = PassthroughRenderer;
    let resolver = Resolver::new(&card, &renderer, &[]);
    let element = resolver.element_config("up");

    let backend = RecordingBackend::default();
    let (event_tx, _events) = mpsc::unbounded_channel();
    let (_confirm_tx, confirm_rx) = mpsc::channel(8);
    let mut dispatcher = Dispatcher::new(&backend, &renderer, event_tx, confirm_rx);

    press_and_dispatch(&element, &mut dispatcher, 80).await;

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    let (domain, service, data) = &calls[0];
    assert_eq!(domain, "remote");
    assert_eq!(service, "send_command");
    assert_eq!(data["command"], serde_json::json!("DPAD_UP"));
}

#[tokio::test]
async fn test_holding_a_repeat_button_refires_its_key() {
    init_tracing();
    let card = card();
    let renderer = PassthroughRenderer;
    let resolver = Resolver::new(&card, &renderer, &[]);
    // Catalog "up" binds hold_action: repeat.
    let element = resolver.element_config("up");

    let backend = RecordingBackend::default();
    let (event_tx, _events) = mpsc::unbounded_channel();
    let (_confirm_tx, confirm_rx) = mpsc::channel(8);
    let mut dispatcher = Dispatcher::new(&backend, &renderer, event_tx, confirm_rx);

    let mut classifier = GestureClassifier::new(GestureConfig::from_element(&element));
    let mut events = classifier.pointer_down(50.0, 50.0, 0);
    events.extend(classifier.tick(HOLD_TIME_MS));
    events.extend(classifier.tick(HOLD_TIME_MS + 300));
    events.extend(classifier.pointer_up(HOLD_TIME_MS + 310));
    for event in &events {
        dispatcher
            .dispatch(event.slot, &element, &RenderContext::default())
            .await
            .unwrap();
    }

    // One firing at the hold deadline plus three repeats at 100 ms.
    let calls = backend.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls
        .iter()
        .all(|(_, _, data)| data["command"] == serde_json::json!("DPAD_UP")));
}

// ============================================================================
// Custom actions end to end
// ============================================================================

#[tokio::test]
async fn test_custom_navigate_action_emits_location_change() {
    init_tracing();
    let card = CardConfig {
        custom_actions: Some(vec![ElementConfig {
            tap_action: Some(Action {
                navigation_path: Some("/lovelace/0".to_string()),
                ..Action::new(ActionKind::Navigate)
            }),
            ..ElementConfig::named(ElementType::Button, "dashboard")
        }]),
        ..card()
    };
    let renderer = PassthroughRenderer;
    let resolver = Resolver::new(&card, &renderer, &[]);
    let element = resolver.element_config("dashboard");

    let backend = RecordingBackend::default();
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let (_confirm_tx, confirm_rx) = mpsc::channel(8);
    let mut dispatcher = Dispatcher::new(&backend, &renderer, event_tx, confirm_rx);

    press_and_dispatch(&element, &mut dispatcher, 50).await;

    assert!(backend.calls().is_empty());
    let mut saw_navigation = false;
    while let Ok(event) = events.try_recv() {
        if let HostEvent::LocationChanged { path, replace } = event {
            assert_eq!(path, "/lovelace/0");
            assert!(!replace);
            saw_navigation = true;
        }
    }
    assert!(saw_navigation);
}

// ============================================================================
// Confirmation round trip end to end
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_denied_confirmation_blocks_the_call() {
    init_tracing();
    let card = card();
    let renderer = PassthroughRenderer;
    let resolver = Resolver::new(&card, &renderer, &[]);
    let mut element = resolver.element_config("power");
    element.tap_action.as_mut().unwrap().confirmation =
        Some(remote_card_core::models::Confirmation::Simple(true));

    let backend = RecordingBackend::default();
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let (confirm_tx, confirm_rx) = mpsc::channel(8);
    let mut dispatcher = Dispatcher::new(&backend, &renderer, event_tx, confirm_rx);

    // The dialog closes without an explicit confirmation.
    confirm_tx.send(ConfirmSignal::DialogClosed).await.unwrap();
    dispatcher
        .dispatch(ActionSlot::Tap, &element, &RenderContext::default())
        .await
        .unwrap();

    assert!(backend.calls().is_empty());
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(seen
        .iter()
        .any(|event| matches!(event, HostEvent::ConfirmationRequest { .. })));
    assert!(seen.contains(&HostEvent::ConfirmationFailed));
}
