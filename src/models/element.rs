//! Interactive element configuration.
//!
//! An [`ElementConfig`] declares one interactive unit of the card: a button,
//! slider, touchpad, or circlepad, with up to ten bound action slots and,
//! for pad types, one level of direction sub-configs.

use serde::{Deserialize, Serialize};

use super::action::{Action, ActionSlot};

/// The interactive element variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// A simple press target.
    #[default]
    Button,
    /// A horizontal or vertical value slider.
    Slider,
    /// A free-form drag surface with direction sub-configs.
    Touchpad,
    /// A directional pad with center button and direction sub-configs.
    Circlepad,
}

/// A direction sub-config key on pad-type elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The up segment.
    Up,
    /// The down segment.
    Down,
    /// The left segment.
    Left,
    /// The right segment.
    Right,
}

impl Direction {
    /// All directions, in rendering order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Configuration field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Map an arrow key name to the direction it routes to on a pad.
    #[must_use]
    pub fn from_arrow_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Declarative description of one interactive element.
///
/// Direction sub-configs recursively contain the same shape, terminating at
/// one level: a direction child never has direction children of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ElementConfig {
    /// Element variant.
    #[serde(rename = "type", default)]
    pub element_type: ElementType,
    /// Catalog lookup name (e.g. `"power"`, `"volume_up"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Entity the element displays and targets by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Attribute path the displayed value is derived from
    /// (default `"state"`; supports a trailing `[N]` index).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_attribute: Option<String>,
    /// Unit appended to the displayed value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,

    /// Single short press.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tap_action: Option<Action>,
    /// Press held past the hold window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_action: Option<Action>,
    /// Two presses within the double tap window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_tap_action: Option<Action>,
    /// Multi-pointer tap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_tap_action: Option<Action>,
    /// Multi-pointer hold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_hold_action: Option<Action>,
    /// Multi-pointer double tap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_double_tap_action: Option<Action>,
    /// Fired on pointer down; configuring it replaces tap/hold handling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentary_start_action: Option<Action>,
    /// Fired on pointer up when momentary mode is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentary_end_action: Option<Action>,
    /// Continuous movement while pressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drag_action: Option<Action>,
    /// Continuous multi-pointer movement while pressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_drag_action: Option<Action>,

    /// Up direction sub-config (pad types only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<Box<ElementConfig>>,
    /// Down direction sub-config (pad types only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down: Option<Box<ElementConfig>>,
    /// Left direction sub-config (pad types only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<ElementConfig>>,
    /// Right direction sub-config (pad types only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<ElementConfig>>,

    /// Icon template string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Label template string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Style template string (consumed by the rendering collaborator).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<String>,
    /// Whether gestures fire haptic pulses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub haptics: Option<bool>,
    /// Whether the resolver autofills entity ids into this element's
    /// actions. Defaults to the card-level setting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autofill_entity_id: Option<bool>,
    /// Post-action backend value suppression window override, milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_from_hass_delay: Option<u64>,

    /// Slider value range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    /// Slider step size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Whether the slider is vertical (disables swipe suppression).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<bool>,
}

impl ElementConfig {
    /// A new element of the given type and catalog name.
    #[must_use]
    pub fn named(element_type: ElementType, name: &str) -> Self {
        Self {
            element_type,
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// The action bound directly to `slot`, without fallback.
    #[must_use]
    pub const fn slot(&self, slot: ActionSlot) -> Option<&Action> {
        match slot {
            ActionSlot::Tap => self.tap_action.as_ref(),
            ActionSlot::Hold => self.hold_action.as_ref(),
            ActionSlot::DoubleTap => self.double_tap_action.as_ref(),
            ActionSlot::MultiTap => self.multi_tap_action.as_ref(),
            ActionSlot::MultiHold => self.multi_hold_action.as_ref(),
            ActionSlot::MultiDoubleTap => self.multi_double_tap_action.as_ref(),
            ActionSlot::MomentaryStart => self.momentary_start_action.as_ref(),
            ActionSlot::MomentaryEnd => self.momentary_end_action.as_ref(),
            ActionSlot::Drag => self.drag_action.as_ref(),
            ActionSlot::MultiDrag => self.multi_drag_action.as_ref(),
        }
    }

    /// Mutable access to the action bound directly to `slot`.
    pub fn slot_mut(&mut self, slot: ActionSlot) -> &mut Option<Action> {
        match slot {
            ActionSlot::Tap => &mut self.tap_action,
            ActionSlot::Hold => &mut self.hold_action,
            ActionSlot::DoubleTap => &mut self.double_tap_action,
            ActionSlot::MultiTap => &mut self.multi_tap_action,
            ActionSlot::MultiHold => &mut self.multi_hold_action,
            ActionSlot::MultiDoubleTap => &mut self.multi_double_tap_action,
            ActionSlot::MomentaryStart => &mut self.momentary_start_action,
            ActionSlot::MomentaryEnd => &mut self.momentary_end_action,
            ActionSlot::Drag => &mut self.drag_action,
            ActionSlot::MultiDrag => &mut self.multi_drag_action,
        }
    }

    /// The first action found along `slot`'s fallback chain.
    #[must_use]
    pub fn resolve_slot(&self, slot: ActionSlot) -> Option<&Action> {
        slot.fallback_chain()
            .iter()
            .find_map(|candidate| self.slot(*candidate))
    }

    /// The direction sub-config, if present.
    #[must_use]
    pub const fn direction(&self, direction: Direction) -> Option<&ElementConfig> {
        let boxed = match direction {
            Direction::Up => self.up.as_ref(),
            Direction::Down => self.down.as_ref(),
            Direction::Left => self.left.as_ref(),
            Direction::Right => self.right.as_ref(),
        };
        match boxed {
            Some(config) => Some(config),
            None => None,
        }
    }

    /// Mutable access to the direction sub-config slot.
    pub fn direction_mut(&mut self, direction: Direction) -> &mut Option<Box<ElementConfig>> {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Whether this element has direction sub-configs to resolve.
    #[must_use]
    pub const fn is_pad(&self) -> bool {
        matches!(
            self.element_type,
            ElementType::Touchpad | ElementType::Circlepad
        )
    }

    /// True for a config with nothing set, which renders as an empty spacer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
