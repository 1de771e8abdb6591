//! Core data model: actions, elements, platforms, entities, and host events.

pub mod action;
pub mod element;
pub mod entity;
pub mod events;
pub mod platform;

pub use action::{
    Action, ActionKind, ActionSlot, Confirmation, ConfirmationDetails, Exemption, StringOrList,
    Target, TargetConfig,
};
pub use element::{Direction, ElementConfig, ElementType};
pub use entity::{entity_domain, EntityState};
pub use events::{ConfirmSignal, Haptic, HostEvent};
pub use platform::Platform;
