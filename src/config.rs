//! Card-level configuration.
//!
//! The card configuration carries the defaults every element falls back to
//! (entity ids, platform, haptics, timing windows) plus the custom action
//! overrides, either inline or loaded from a host-served file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::backend::Backend;
use crate::models::{ElementConfig, Platform};

/// Top-level card configuration.
///
/// The `rows` layout and styling fields are consumed by the rendering
/// collaborator; they are carried opaquely so host configs round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CardConfig {
    /// Card title template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Default platform dialect for `key`/`source` actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// Default remote entity id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    /// Default media player entity id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_player_id: Option<String>,
    /// Default keyboard entity id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard_id: Option<String>,
    /// Default Unified Remote style device name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Card-wide haptics default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub haptics: Option<bool>,
    /// Card-wide autofill default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autofill_entity_id: Option<bool>,
    /// Card-wide hold time, milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_time: Option<u64>,
    /// Card-wide double tap window, milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_tap_window: Option<u64>,
    /// Card-wide repeat delay, milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_delay: Option<u64>,
    /// Card-wide post-action value suppression window, milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_from_hass_delay: Option<u64>,
    /// Inline custom element overrides, matched by name before the platform
    /// catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_actions: Option<Vec<ElementConfig>>,
    /// Host-served file (JSON or YAML array) of further custom elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_actions_file: Option<String>,
    /// Row layout, consumed by the rendering collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Value>,
    /// Card style template, consumed by the rendering collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<String>,
}

impl CardConfig {
    /// The platform dialect, defaulting to Android TV.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_default()
    }
}

/// Parse a custom actions catalog from file text.
///
/// `.json` files are parsed as JSON5 (plain JSON is a subset); anything
/// else is parsed as YAML. The file must hold an array of element configs.
pub fn parse_custom_actions(filename: &str, contents: &str) -> Result<Vec<ElementConfig>> {
    let is_json = filename
        .rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed: Value = if is_json {
        json5::from_str(contents)
            .with_context(|| format!("failed to parse {filename} as JSON"))?
    } else {
        serde_yml::from_str(contents)
            .with_context(|| format!("failed to parse {filename} as YAML"))?
    };
    if !parsed.is_array() {
        anyhow::bail!("{filename} is not a JSON or YAML array");
    }
    serde_json::from_value(parsed)
        .with_context(|| format!("{filename} is not an array of element configs"))
}

/// Fetch and parse the card's custom actions file.
///
/// Malformed or unfetchable files are logged and degrade to an empty
/// catalog; a bad file must never take the card down.
pub async fn fetch_custom_actions<B: Backend>(backend: &B, path: &str) -> Vec<ElementConfig> {
    let normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    let contents = match backend.fetch_file(&normalized).await {
        Ok(contents) => contents,
        Err(err) => {
            error!("failed to fetch custom actions file {normalized}: {err:#}");
            return Vec::new();
        }
    };
    match parse_custom_actions(&normalized, &contents) {
        Ok(actions) => actions,
        Err(err) => {
            error!("{err:#}");
            Vec::new()
        }
    }
}
