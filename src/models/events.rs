//! Events exchanged with the host UI layer.
//!
//! Explicit message passing instead of a global event bus: the dispatcher
//! emits [`HostEvent`]s over a channel the host owns, and the host answers
//! confirmation prompts with [`ConfirmSignal`]s.

use super::action::Action;

/// Haptic feedback pulse strengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    /// Short tick for taps and slider releases.
    Light,
    /// Medium tick for holds.
    Medium,
    /// Failure pulse, fired with failure notifications.
    Failure,
}

/// A message from the engine to the host UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Ask the user to confirm a gated action. The host must eventually
    /// answer with a [`ConfirmSignal`].
    ConfirmationRequest {
        /// Prompt text, explicit or derived from the action's name.
        text: String,
    },
    /// A gated action was denied, timed out, or had no action to run.
    /// Lets the host reset optimistic UI state.
    ConfirmationFailed,
    /// Open a virtual keyboard, textbox, or search dialog.
    DialogShow(Action),
    /// Client-side navigation happened.
    LocationChanged {
        /// Dashboard path navigated to.
        path: String,
        /// Whether history was replaced rather than pushed.
        replace: bool,
    },
    /// Open an external URL.
    OpenUrl {
        /// Fully qualified URL.
        url: String,
    },
    /// Open the more-info dialog for an entity.
    MoreInfo {
        /// Entity to show.
        entity_id: String,
    },
    /// Open the voice assistant.
    Assist {
        /// Assist pipeline to open, host default when `None`.
        pipeline_id: Option<String>,
        /// Whether to start listening immediately.
        start_listening: Option<bool>,
    },
    /// A `fire-dom-event` action fired.
    DomEvent {
        /// Event type, `"ll-custom"` when unconfigured.
        event_type: String,
        /// The full resolved action as event detail.
        action: Box<Action>,
    },
    /// Arbitrary script text from an `eval` action. Unsandboxed by design;
    /// executing it is the host's decision and risk.
    Eval {
        /// Raw script text.
        code: String,
    },
    /// Haptic feedback pulse.
    Haptic(Haptic),
    /// Transient user-visible failure notification.
    Notification {
        /// Localized or fallback message text.
        message: String,
    },
}

/// The host's answer signals during a confirmation round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmSignal {
    /// The user explicitly confirmed. Always wins the race against the
    /// default-deny timeout.
    Confirmed,
    /// The confirmation dialog closed without an explicit answer. Arms the
    /// short default-deny timeout.
    DialogClosed,
}
