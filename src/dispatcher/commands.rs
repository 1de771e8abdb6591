//! Per-platform backend command dialects.
//!
//! Each supported platform speaks its own service vocabulary for key and
//! source commands. The dialects are pure functions from an action to a
//! backend call description, keyed by the action's platform tag; adding a
//! platform means adding match arms here, nothing else.

use serde_json::{json, Map, Value};

use crate::models::{Action, Platform, StringOrList, Target};

/// One fully described backend service call.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendCall {
    /// Service domain.
    pub domain: String,
    /// Service name within the domain.
    pub service: String,
    /// Service data payload.
    pub data: Value,
    /// Call target.
    pub target: Option<Target>,
}

impl BackendCall {
    fn new(domain: &str, service: &str, data: Value, target_entity: Option<&str>) -> Self {
        Self {
            domain: domain.to_string(),
            service: service.to_string(),
            data,
            target: target_entity.map(|entity_id| Target {
                entity_id: Some(StringOrList::from(entity_id)),
                ..Target::default()
            }),
        }
    }
}

/// The backend call for a `key` action, or `None` for platforms whose key
/// handling lives outside the backend (Unified Remote drives its own app).
///
/// `hold` attaches the one-second `hold_secs` field used when a hold gesture
/// fell back onto the tap slot's key.
#[must_use]
pub fn key_call(action: &Action, hold: bool) -> Option<BackendCall> {
    let key = action.key.as_deref()?;
    let platform = action.platform.unwrap_or_default();
    match platform {
        Platform::Kodi => Some(BackendCall::new(
            "kodi",
            "call_method",
            json!({ "method": key }),
            action.media_player_id.as_deref(),
        )),
        Platform::LgWebos => {
            let mut data = Map::new();
            if let Some(entity_id) = &action.media_player_id {
                data.insert("entity_id".to_string(), json!(entity_id));
            }
            data.insert("button".to_string(), json!(key));
            Some(BackendCall::new(
                "webostv",
                "button",
                Value::Object(data),
                None,
            ))
        }
        Platform::UnifiedRemote => None,
        _ => {
            let mut data = Map::new();
            data.insert("command".to_string(), json!(key));
            if let Some(device) = &action.device {
                data.insert("device".to_string(), json!(device));
            }
            if hold {
                data.insert("hold_secs".to_string(), json!(1));
            }
            Some(BackendCall::new(
                "remote",
                "send_command",
                Value::Object(data),
                action.remote_id.as_deref(),
            ))
        }
    }
}

/// The backend call for a `source` action, or `None` for platforms with no
/// backend source selection.
#[must_use]
pub fn source_call(action: &Action) -> Option<BackendCall> {
    let source = action.source.as_deref()?;
    let platform = action.platform.unwrap_or_default();
    match platform {
        Platform::AppleTv | Platform::Roku | Platform::SamsungTv | Platform::LgWebos => {
            Some(BackendCall::new(
                "media_player",
                "select_source",
                json!({ "source": source }),
                action.media_player_id.as_deref(),
            ))
        }
        Platform::SonyBravia => Some(BackendCall::new(
            "media_player",
            "play_media",
            json!({
                "media_content_id": source,
                "media_content_type": "app",
            }),
            action.media_player_id.as_deref(),
        )),
        Platform::Kodi
        | Platform::PhilipsTv
        | Platform::Jellyfin
        | Platform::UnifiedRemote
        | Platform::GenericRemote => None,
        Platform::AndroidTv | Platform::FireTv => Some(BackendCall::new(
            "remote",
            "turn_on",
            json!({ "activity": source }),
            action.remote_id.as_deref(),
        )),
    }
}

/// The semantically correct toggle call for one entity in its current
/// state. Falls back to a generic homeassistant on/off flip keyed by the
/// "inactive" states.
#[must_use]
pub fn toggle_call(entity_id: &str, state: &str) -> BackendCall {
    let domain = crate::models::entity_domain(entity_id);
    let (call_domain, service) = match domain {
        "lock" => ("lock", if state == "locked" { "unlock" } else { "lock" }),
        "cover" => (
            "cover",
            if state == "closed" {
                "open_cover"
            } else {
                "close_cover"
            },
        ),
        "valve" => (
            "valve",
            if state == "closed" {
                "open_valve"
            } else {
                "close_valve"
            },
        ),
        "button" | "input_button" => (domain, "press"),
        "scene" => ("scene", "turn_on"),
        _ => (
            "homeassistant",
            if matches!(state, "closed" | "locked" | "off") {
                "turn_on"
            } else {
                "turn_off"
            },
        ),
    };
    BackendCall::new(
        call_domain,
        service,
        Value::Object(Map::new()),
        Some(entity_id),
    )
}
