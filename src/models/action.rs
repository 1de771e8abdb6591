//! Action configuration: what an interactive element does when a gesture
//! resolves against one of its action slots.
//!
//! An [`Action`] is one closed tagged kind plus the kind-specific fields it
//! carries: a single struct of optional fields discriminated by
//! [`ActionKind`], so validation is exhaustive matching rather than ad hoc
//! key probing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::platform::Platform;

/// The closed set of action kinds an element may bind to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Open the host's more-info dialog for an entity.
    MoreInfo,
    /// Toggle one or more entities with a domain-appropriate verb.
    Toggle,
    /// Client-side navigation within the dashboard.
    Navigate,
    /// Open an external URL.
    Url,
    /// Generic `domain.service` backend call.
    ///
    /// `call-service` is accepted as a deprecated alias.
    #[serde(alias = "call-service")]
    PerformAction,
    /// Open the host's voice assistant.
    Assist,
    /// Send a platform-dialect key command.
    Key,
    /// Send a platform-dialect source/app selection command.
    Source,
    /// Open the virtual keyboard dialog.
    Keyboard,
    /// Open the single-line textbox dialog.
    Textbox,
    /// Open the global search dialog.
    Search,
    /// Fire a custom event into the host UI layer.
    FireDomEvent,
    /// Forward arbitrary script text to the host.
    ///
    /// Deliberately unsandboxed escape hatch. The engine never executes the
    /// script itself; it is emitted as [`HostEvent::Eval`] and running it is
    /// the host's documented risk.
    ///
    /// [`HostEvent::Eval`]: super::events::HostEvent::Eval
    Eval,
    /// Repeat the tap action while held. Handled entirely inside the
    /// gesture classifier's hold-repeat loop; never reaches the backend.
    Repeat,
    /// No action.
    #[default]
    None,
}

impl ActionKind {
    /// The configuration-facing name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MoreInfo => "more-info",
            Self::Toggle => "toggle",
            Self::Navigate => "navigate",
            Self::Url => "url",
            Self::PerformAction => "perform-action",
            Self::Assist => "assist",
            Self::Key => "key",
            Self::Source => "source",
            Self::Keyboard => "keyboard",
            Self::Textbox => "textbox",
            Self::Search => "search",
            Self::FireDomEvent => "fire-dom-event",
            Self::Eval => "eval",
            Self::Repeat => "repeat",
            Self::None => "none",
        }
    }
}

/// One of `entity_id` style fields that accept a single id or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    /// A single id.
    One(String),
    /// A list of ids.
    Many(Vec<String>),
}

impl StringOrList {
    /// The first id, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(s) => Some(s),
            Self::Many(list) => list.first().map(String::as_str),
        }
    }

    /// All ids in configuration order.
    #[must_use]
    pub fn iter(&self) -> Vec<&str> {
        match self {
            Self::One(s) => vec![s.as_str()],
            Self::Many(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for StringOrList {
    fn from(s: &str) -> Self {
        Self::One(s.to_string())
    }
}

/// Backend call target: entities, devices, areas, or labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Target {
    /// Target entity id(s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<StringOrList>,
    /// Target device id(s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<StringOrList>,
    /// Target area id(s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_id: Option<StringOrList>,
    /// Target label id(s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_id: Option<StringOrList>,
}

impl Target {
    /// True when no target field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entity_id.is_none()
            && self.device_id.is_none()
            && self.area_id.is_none()
            && self.label_id.is_none()
    }
}

/// A call target as configured: either a structured target block or a
/// template string that renders into one during deep render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetConfig {
    /// `target: { entity_id: ... }`.
    Structured(Target),
    /// `target: "{{ ... }}"`, re-parsed as a mapping after rendering.
    Template(String),
}

impl TargetConfig {
    /// The structured target, if this is (or has rendered into) one.
    #[must_use]
    pub const fn structured(&self) -> Option<&Target> {
        match self {
            Self::Structured(target) => Some(target),
            Self::Template(_) => None,
        }
    }
}

impl From<Target> for TargetConfig {
    fn from(target: Target) -> Self {
        Self::Structured(target)
    }
}

/// A user exemption from a confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exemption {
    /// Backend user id exempt from confirming.
    pub user: String,
}

/// Confirmation prompt details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfirmationDetails {
    /// Explicit prompt text. Derived from the action's localized name when
    /// absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Users who may skip the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exemptions: Option<Vec<Exemption>>,
}

/// An optional user-confirmation gate on an action: either a bare boolean or
/// a detailed prompt configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confirmation {
    /// `confirmation: true` / `confirmation: false`.
    Simple(bool),
    /// `confirmation: { text, exemptions }`.
    Detailed(ConfirmationDetails),
}

impl Confirmation {
    /// Whether the given user must confirm before the action runs.
    #[must_use]
    pub fn required_for(&self, user_id: Option<&str>) -> bool {
        match self {
            Self::Simple(enabled) => *enabled,
            Self::Detailed(details) => match (&details.exemptions, user_id) {
                (Some(exemptions), Some(user)) => !exemptions.iter().any(|e| e.user == user),
                _ => true,
            },
        }
    }

    /// Explicit prompt text, if configured.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Simple(_) => None,
            Self::Detailed(details) => details.text.as_deref(),
        }
    }
}

/// A fully declared action bound to one slot of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Action {
    /// The action kind discriminant.
    pub action: ActionKind,

    /// Platform dialect override for `key`/`source` actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// Key command for `key` actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Source/app identifier for `source` actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Remote entity id used by `key`/`source` dialects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    /// Media player entity id used by `key`/`source` dialects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_player_id: Option<String>,
    /// Keyboard entity id used by the keyboard dialog family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard_id: Option<String>,
    /// Prompt text shown in the keyboard dialog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard_prompt: Option<String>,
    /// Unified Remote style device name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// `domain.service` for `perform-action`.
    ///
    /// `service` is accepted as a deprecated alias.
    #[serde(skip_serializing_if = "Option::is_none", alias = "service")]
    pub perform_action: Option<String>,
    /// Free-form service data. May be a template string that renders into a
    /// whole mapping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Call target. May be a template string that renders into a whole
    /// mapping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetConfig>,

    /// Dashboard path for `navigate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_path: Option<String>,
    /// Replace-vs-push history semantics for `navigate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_replace: Option<bool>,
    /// External URL for `url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,

    /// Optional user-confirmation gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<Confirmation>,

    /// Assist pipeline to open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<String>,
    /// Whether assist starts listening immediately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_listening: Option<bool>,

    /// Event type for `fire-dom-event`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Script text for `eval`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval: Option<String>,

    /// Per-slot double tap window override, milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_tap_window: Option<u64>,
    /// Per-slot hold time override, milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_time: Option<u64>,
    /// Per-slot repeat delay override, milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_delay: Option<u64>,
}

impl Action {
    /// A new action of the given kind with no fields set.
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self {
            action: kind,
            ..Self::default()
        }
    }

    /// Shorthand for a `key` action, used by the default catalogs.
    #[must_use]
    pub fn key(key: &str) -> Self {
        Self {
            action: ActionKind::Key,
            key: Some(key.to_string()),
            ..Self::default()
        }
    }

    /// Shorthand for a `source` action, used by the default catalogs.
    #[must_use]
    pub fn source(source: &str) -> Self {
        Self {
            action: ActionKind::Source,
            source: Some(source.to_string()),
            ..Self::default()
        }
    }

    /// Shorthand for a `repeat` hold action.
    #[must_use]
    pub fn repeat() -> Self {
        Self::new(ActionKind::Repeat)
    }
}

/// The named interaction hooks an element config may bind actions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSlot {
    /// Single short press.
    Tap,
    /// Single press held past the hold window.
    Hold,
    /// Two presses within the double tap window.
    DoubleTap,
    /// Multi-pointer short press.
    MultiTap,
    /// Multi-pointer hold.
    MultiHold,
    /// Multi-pointer double tap.
    MultiDoubleTap,
    /// Fired on pointer down when momentary mode is configured.
    MomentaryStart,
    /// Fired on pointer up when momentary mode is configured.
    MomentaryEnd,
    /// Continuous movement while pressed.
    Drag,
    /// Continuous multi-pointer movement while pressed.
    MultiDrag,
}

impl ActionSlot {
    /// All slots, in configuration order.
    pub const ALL: [Self; 10] = [
        Self::Tap,
        Self::Hold,
        Self::DoubleTap,
        Self::MultiTap,
        Self::MultiHold,
        Self::MultiDoubleTap,
        Self::MomentaryStart,
        Self::MomentaryEnd,
        Self::Drag,
        Self::MultiDrag,
    ];

    /// Configuration field name of the slot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tap => "tap_action",
            Self::Hold => "hold_action",
            Self::DoubleTap => "double_tap_action",
            Self::MultiTap => "multi_tap_action",
            Self::MultiHold => "multi_hold_action",
            Self::MultiDoubleTap => "multi_double_tap_action",
            Self::MomentaryStart => "momentary_start_action",
            Self::MomentaryEnd => "momentary_end_action",
            Self::Drag => "drag_action",
            Self::MultiDrag => "multi_drag_action",
        }
    }

    /// The slots to try, in order, when resolving this slot against an
    /// element. The chain is total and acyclic: every multi and empty slot
    /// bottoms out at `tap_action` (or nothing) in at most three hops past
    /// the slot itself.
    #[must_use]
    pub const fn fallback_chain(self) -> &'static [Self] {
        match self {
            Self::Tap => &[Self::Tap],
            Self::Hold => &[Self::Hold, Self::Tap],
            Self::DoubleTap => &[Self::DoubleTap, Self::Tap],
            Self::MultiTap => &[Self::MultiTap, Self::Tap],
            Self::MultiHold => &[Self::MultiHold, Self::Hold, Self::MultiTap, Self::Tap],
            Self::MultiDoubleTap => &[
                Self::MultiDoubleTap,
                Self::DoubleTap,
                Self::MultiTap,
                Self::Tap,
            ],
            Self::MomentaryStart => &[Self::MomentaryStart],
            Self::MomentaryEnd => &[Self::MomentaryEnd],
            Self::Drag => &[Self::Drag],
            Self::MultiDrag => &[Self::MultiDrag, Self::Drag],
        }
    }

    /// Whether this slot is a hold variant. Hold-slot `key` dispatches may
    /// attach `hold_secs` to the backend payload.
    #[must_use]
    pub const fn is_hold(self) -> bool {
        matches!(self, Self::Hold | Self::MultiHold)
    }
}

impl std::fmt::Display for ActionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
