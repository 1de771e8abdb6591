//! Gesture classification.
//!
//! A [`GestureClassifier`] owns the interaction state of one element and
//! turns raw pointer/key events into action slot firings. It is a pure
//! state machine over caller-supplied millisecond timestamps: nothing in
//! here sleeps or schedules. The host event loop feeds input events as they
//! arrive, calls [`GestureClassifier::tick`] when the clock reaches
//! [`GestureClassifier::next_deadline`], and dispatches whatever events
//! come back.
//!
//! States: idle, pressed, held, and a post-release window awaiting a
//! possible second tap. Every cycle terminates back at idle; no session
//! survives a full press-release cycle.

use crate::constants::{
    DOUBLE_TAP_WINDOW_MS, HOLD_MOVEMENT_THRESHOLD_PX, HOLD_TIME_MS, KEYBOARD_POINTER_COORD,
    REPEAT_DELAY_MS, SWIPE_SENSITIVITY_PX,
};
use crate::models::{ActionKind, ActionSlot, ElementConfig};

/// Timing windows and slot availability extracted from a resolved element.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Press duration before a hold fires, milliseconds.
    pub hold_time: u64,
    /// Multi-pointer hold duration, milliseconds.
    pub multi_hold_time: u64,
    /// Window after a release in which a second press upgrades the tap to a
    /// double tap, milliseconds.
    pub double_tap_window: u64,
    /// Multi-pointer double tap window, milliseconds.
    pub multi_double_tap_window: u64,
    /// Interval between repeat firings while a repeat-hold is held down,
    /// milliseconds.
    pub repeat_delay: u64,
    /// Minimum interval between drag firings, milliseconds.
    pub drag_delay: u64,
    /// Minimum interval between multi-pointer drag firings, milliseconds.
    pub multi_drag_delay: u64,
    /// Whether a double tap slot is bound, enabling the post-release window.
    pub has_double_tap: bool,
    /// Whether a multi-pointer double tap slot is bound.
    pub has_multi_double_tap: bool,
    /// Whether the hold slot resolves to a `repeat` action, which re-fires
    /// the tap slot at `repeat_delay` instead of firing a hold.
    pub hold_repeats: bool,
    /// Whether the multi-pointer hold slot resolves to `repeat`.
    pub multi_hold_repeats: bool,
    /// Whether a drag slot is bound.
    pub has_drag: bool,
    /// Whether a multi-pointer drag slot is bound.
    pub has_multi_drag: bool,
    /// Momentary mode: pointer down/up fire the momentary slots and tap,
    /// hold, and double tap handling is disabled.
    pub momentary: bool,
    /// Suppress tap and hold when vertical movement dominates, so a
    /// horizontal slider coexists with a vertically scrollable page.
    pub suppress_vertical_swipe: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_time: HOLD_TIME_MS,
            multi_hold_time: HOLD_TIME_MS,
            double_tap_window: DOUBLE_TAP_WINDOW_MS,
            multi_double_tap_window: DOUBLE_TAP_WINDOW_MS,
            repeat_delay: REPEAT_DELAY_MS,
            drag_delay: 0,
            multi_drag_delay: 0,
            has_double_tap: false,
            has_multi_double_tap: false,
            hold_repeats: false,
            multi_hold_repeats: false,
            has_drag: false,
            has_multi_drag: false,
            momentary: false,
            suppress_vertical_swipe: false,
        }
    }
}

impl GestureConfig {
    /// Extract the timing windows and bound slots from a resolved element.
    #[must_use]
    pub fn from_element(element: &ElementConfig) -> Self {
        let bound = |slot| {
            element
                .slot(slot)
                .is_some_and(|action| action.action != ActionKind::None)
        };
        let slot_millis = |slot, pick: fn(&crate::models::Action) -> Option<u64>, default| {
            element.slot(slot).and_then(pick).unwrap_or(default)
        };
        let hold_time = slot_millis(ActionSlot::Hold, |a| a.hold_time, HOLD_TIME_MS);
        let double_tap_window = slot_millis(
            ActionSlot::DoubleTap,
            |a| a.double_tap_window,
            DOUBLE_TAP_WINDOW_MS,
        );
        let repeats = |slot| {
            element
                .resolve_slot(slot)
                .is_some_and(|action| action.action == ActionKind::Repeat)
        };
        Self {
            hold_time,
            multi_hold_time: slot_millis(ActionSlot::MultiHold, |a| a.hold_time, hold_time),
            double_tap_window,
            multi_double_tap_window: slot_millis(
                ActionSlot::MultiDoubleTap,
                |a| a.double_tap_window,
                double_tap_window,
            ),
            repeat_delay: slot_millis(ActionSlot::Hold, |a| a.repeat_delay, REPEAT_DELAY_MS),
            drag_delay: slot_millis(ActionSlot::Drag, |a| a.repeat_delay, 0),
            multi_drag_delay: slot_millis(ActionSlot::MultiDrag, |a| a.repeat_delay, 0),
            has_double_tap: bound(ActionSlot::DoubleTap),
            has_multi_double_tap: bound(ActionSlot::MultiDoubleTap),
            hold_repeats: repeats(ActionSlot::Hold),
            multi_hold_repeats: repeats(ActionSlot::MultiHold),
            has_drag: bound(ActionSlot::Drag),
            has_multi_drag: bound(ActionSlot::MultiDrag),
            momentary: bound(ActionSlot::MomentaryStart) || bound(ActionSlot::MomentaryEnd),
            suppress_vertical_swipe: element.element_type
                == crate::models::ElementType::Slider
                && !element.vertical.unwrap_or(false),
        }
    }
}

/// Pointer coordinates captured at the moment a gesture fires, handed to
/// the dispatcher for the template render context.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSnapshot {
    /// Pointer-down X coordinate.
    pub initial_x: f64,
    /// Pointer-down Y coordinate.
    pub initial_y: f64,
    /// Latest pointer X coordinate.
    pub current_x: f64,
    /// Latest pointer Y coordinate.
    pub current_y: f64,
    /// X movement since the previous drag firing (incremental).
    pub delta_x: f64,
    /// Y movement since the previous drag firing (incremental).
    pub delta_y: f64,
    /// Seconds between momentary start and end, `0.0` otherwise.
    pub hold_secs: f64,
}

impl PointerSnapshot {
    /// A template render context carrying this snapshot's coordinates and
    /// hold duration. The caller fills in value, unit, and element config.
    #[must_use]
    pub fn render_context(&self) -> crate::template::RenderContext {
        crate::template::RenderContext {
            hold_secs: self.hold_secs,
            initial_x: Some(self.initial_x),
            initial_y: Some(self.initial_y),
            current_x: Some(self.current_x),
            current_y: Some(self.current_y),
            delta_x: Some(self.delta_x),
            delta_y: Some(self.delta_y),
            ..crate::template::RenderContext::default()
        }
    }
}

/// One classified gesture, ready for dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    /// The action slot to dispatch.
    pub slot: ActionSlot,
    /// Pointer state at the moment of classification.
    pub snapshot: PointerSnapshot,
}

/// Ephemeral per-press interaction state. Created on the first pointer
/// down, consumed on release or cancellation.
#[derive(Debug, Clone, PartialEq)]
struct GestureSession {
    pressed_at: u64,
    active_pointers: u8,
    /// Peak pointer count; routes the gesture to its `multi_*` variant.
    max_pointers: u8,
    initial_x: f64,
    initial_y: f64,
    current_x: f64,
    current_y: f64,
    /// Movement since the last emitted drag event.
    pending_dx: f64,
    pending_dy: f64,
    /// Cumulative movement from the press point, for the hold movement
    /// threshold and swipe suppression.
    travel_x: f64,
    travel_y: f64,
    swiping: bool,
    dragged: bool,
    /// The hold deadline came due while movement disqualified the hold; the
    /// deadline is spent and must not re-arm.
    hold_spent: bool,
    last_drag_at: Option<u64>,
}

impl GestureSession {
    fn new(x: f64, y: f64, now: u64) -> Self {
        Self {
            pressed_at: now,
            active_pointers: 1,
            max_pointers: 1,
            initial_x: x,
            initial_y: y,
            current_x: x,
            current_y: y,
            pending_dx: 0.0,
            pending_dy: 0.0,
            travel_x: 0.0,
            travel_y: 0.0,
            swiping: false,
            dragged: false,
            hold_spent: false,
            last_drag_at: None,
        }
    }

    fn multi(&self) -> bool {
        self.max_pointers > 1
    }

    fn snapshot(&self) -> PointerSnapshot {
        PointerSnapshot {
            initial_x: self.initial_x,
            initial_y: self.initial_y,
            current_x: self.current_x,
            current_y: self.current_y,
            delta_x: self.pending_dx,
            delta_y: self.pending_dy,
            hold_secs: 0.0,
        }
    }

    fn moved_past(&self, threshold: f64) -> bool {
        self.travel_x.abs() > threshold || self.travel_y.abs() > threshold
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Pressed(GestureSession),
    /// Hold fired (or is repeat-firing); waiting for release.
    Held {
        session: GestureSession,
        repeating: bool,
        last_repeat_at: u64,
    },
    /// Released; a second press within the window upgrades to double tap.
    AwaitingSecondTap {
        deadline: u64,
        multi: bool,
        snapshot: PointerSnapshot,
    },
}

/// The per-element gesture state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureClassifier {
    config: GestureConfig,
    phase: Phase,
    /// Set when a second press lands inside the double tap window; its
    /// release classifies as a double tap.
    pending_double: bool,
    /// Guards synthetic key presses against OS key auto-repeat.
    key_pressed: bool,
}

impl GestureClassifier {
    /// A classifier in the idle state.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            pending_double: false,
            key_pressed: false,
        }
    }

    /// Whether a press is currently in progress.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        matches!(self.phase, Phase::Pressed(_) | Phase::Held { .. })
    }

    /// The next timestamp at which [`GestureClassifier::tick`] has work to
    /// do, or `None` while nothing is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Pressed(session) => {
                if self.config.momentary || session.hold_spent {
                    return None;
                }
                let hold_time = if session.multi() {
                    self.config.multi_hold_time
                } else {
                    self.config.hold_time
                };
                Some(session.pressed_at + hold_time)
            }
            Phase::Held {
                repeating,
                last_repeat_at,
                ..
            } => repeating.then(|| last_repeat_at + self.config.repeat_delay),
            Phase::AwaitingSecondTap { deadline, .. } => Some(*deadline),
        }
    }

    /// First pointer down starts a session; further pointer downs while
    /// pressed route the gesture to its multi-pointer variant.
    pub fn pointer_down(&mut self, x: f64, y: f64, now: u64) -> Vec<GestureEvent> {
        let mut events = self.tick(now);
        match &mut self.phase {
            Phase::Idle => {
                self.phase = Phase::Pressed(GestureSession::new(x, y, now));
                if self.config.momentary {
                    events.push(GestureEvent {
                        slot: ActionSlot::MomentaryStart,
                        snapshot: PointerSnapshot {
                            initial_x: x,
                            initial_y: y,
                            current_x: x,
                            current_y: y,
                            ..PointerSnapshot::default()
                        },
                    });
                }
            }
            Phase::Pressed(session) | Phase::Held { session, .. } => {
                session.active_pointers = session.active_pointers.saturating_add(1);
                session.max_pointers = session.max_pointers.max(session.active_pointers);
            }
            Phase::AwaitingSecondTap { multi, .. } => {
                // Second press inside the window; classification happens on
                // its release.
                let mut session = GestureSession::new(x, y, now);
                if *multi {
                    session.max_pointers = 2;
                }
                self.phase = Phase::Pressed(session);
                self.pending_double = true;
            }
        }
        events
    }

    /// Pointer movement while pressed. Deltas accumulate between drag
    /// firings, so drag consumers always see incremental movement.
    pub fn pointer_move(&mut self, x: f64, y: f64, now: u64) -> Vec<GestureEvent> {
        let mut events = self.tick(now);
        let suppress = self.config.suppress_vertical_swipe;
        let (drag_bound, delay) = match &self.phase {
            Phase::Pressed(session) | Phase::Held { session, .. } if session.multi() => (
                self.config.has_multi_drag,
                self.config.multi_drag_delay,
            ),
            _ => (self.config.has_drag, self.config.drag_delay),
        };
        let (Phase::Pressed(session) | Phase::Held { session, .. }) = &mut self.phase else {
            return events;
        };

        let dx = x - session.current_x;
        let dy = y - session.current_y;
        session.current_x = x;
        session.current_y = y;
        session.pending_dx += dx;
        session.pending_dy += dy;
        session.travel_x += dx;
        session.travel_y += dy;

        if suppress
            && session.travel_y.abs() > session.travel_x.abs() + SWIPE_SENSITIVITY_PX
        {
            session.swiping = true;
        }

        if drag_bound && !session.swiping {
            let due = session
                .last_drag_at
                .is_none_or(|last| now.saturating_sub(last) >= delay);
            if due {
                let slot = if session.multi() {
                    ActionSlot::MultiDrag
                } else {
                    ActionSlot::Drag
                };
                events.push(GestureEvent {
                    slot,
                    snapshot: session.snapshot(),
                });
                session.pending_dx = 0.0;
                session.pending_dy = 0.0;
                session.last_drag_at = Some(now);
                session.dragged = true;
            }
        }
        events
    }

    /// Pointer release. The last pointer up classifies the gesture.
    pub fn pointer_up(&mut self, now: u64) -> Vec<GestureEvent> {
        let mut events = self.tick(now);
        if let Phase::Pressed(session) | Phase::Held { session, .. } = &mut self.phase {
            if session.active_pointers > 1 {
                // Not the final pointer; keep the session alive.
                session.active_pointers -= 1;
                return events;
            }
        }
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::Held { .. } => {
                // Hold already fired; the release just ends the session.
                self.pending_double = false;
            }
            Phase::Pressed(session) => {
                events.extend(self.classify_release(session, now));
            }
            awaiting @ Phase::AwaitingSecondTap { .. } => {
                // Stray release outside a press; keep waiting.
                self.phase = awaiting;
            }
        }
        events
    }

    fn classify_release(&mut self, session: GestureSession, now: u64) -> Vec<GestureEvent> {
        let multi = session.multi();
        if self.config.momentary {
            let mut snapshot = session.snapshot();
            snapshot.hold_secs = (now.saturating_sub(session.pressed_at)) as f64 / 1000.0;
            return vec![GestureEvent {
                slot: ActionSlot::MomentaryEnd,
                snapshot,
            }];
        }
        if session.swiping || session.dragged {
            self.pending_double = false;
            return Vec::new();
        }

        let snapshot = session.snapshot();
        if std::mem::take(&mut self.pending_double) {
            let slot = if multi {
                ActionSlot::MultiDoubleTap
            } else {
                ActionSlot::DoubleTap
            };
            return vec![GestureEvent { slot, snapshot }];
        }

        let double_bound = if multi {
            self.config.has_multi_double_tap
        } else {
            self.config.has_double_tap
        };
        if double_bound {
            let window = if multi {
                self.config.multi_double_tap_window
            } else {
                self.config.double_tap_window
            };
            self.phase = Phase::AwaitingSecondTap {
                deadline: now + window,
                multi,
                snapshot,
            };
            return Vec::new();
        }
        // No double tap bound; fire the tap without waiting out the window.
        let slot = if multi {
            ActionSlot::MultiTap
        } else {
            ActionSlot::Tap
        };
        vec![GestureEvent { slot, snapshot }]
    }

    /// Advance the clock: fires holds, hold-repeats, and pending taps whose
    /// windows have elapsed. Safe to call at any time.
    pub fn tick(&mut self, now: u64) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        loop {
            let Some(deadline) = self.next_deadline() else {
                break;
            };
            if now < deadline {
                break;
            }
            match std::mem::replace(&mut self.phase, Phase::Idle) {
                Phase::Pressed(mut session) => {
                    let multi = session.multi();
                    if session.swiping
                        || session.moved_past(HOLD_MOVEMENT_THRESHOLD_PX)
                    {
                        // Movement disqualifies the hold; wait for release.
                        session.hold_spent = true;
                        self.phase = Phase::Pressed(session);
                        return events;
                    }
                    let repeats = if multi {
                        self.config.multi_hold_repeats
                    } else {
                        self.config.hold_repeats
                    };
                    let slot = match (repeats, multi) {
                        // A repeat-hold re-fires the tap slot instead.
                        (true, false) => ActionSlot::Tap,
                        (true, true) => ActionSlot::MultiTap,
                        (false, false) => ActionSlot::Hold,
                        (false, true) => ActionSlot::MultiHold,
                    };
                    events.push(GestureEvent {
                        slot,
                        snapshot: session.snapshot(),
                    });
                    self.phase = Phase::Held {
                        session,
                        repeating: repeats,
                        last_repeat_at: deadline,
                    };
                }
                Phase::Held {
                    session,
                    repeating,
                    last_repeat_at,
                } => {
                    let slot = if session.multi() {
                        ActionSlot::MultiTap
                    } else {
                        ActionSlot::Tap
                    };
                    events.push(GestureEvent {
                        slot,
                        snapshot: session.snapshot(),
                    });
                    self.phase = Phase::Held {
                        session,
                        repeating,
                        last_repeat_at: last_repeat_at + self.config.repeat_delay,
                    };
                }
                Phase::AwaitingSecondTap {
                    multi, snapshot, ..
                } => {
                    // Window elapsed with no second press; it was a tap.
                    let slot = if multi {
                        ActionSlot::MultiTap
                    } else {
                        ActionSlot::Tap
                    };
                    events.push(GestureEvent { slot, snapshot });
                }
                Phase::Idle => break,
            }
        }
        events
    }

    /// Pointer cancellation: drop the session without firing anything.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
        self.pending_double = false;
        self.key_pressed = false;
    }

    /// Pointer leaving the element bounds ends the session, but only for
    /// mouse input; touch streams report leave events mid-gesture.
    pub fn pointer_leave(&mut self, is_mouse: bool) {
        if is_mouse && self.is_pressed() {
            self.cancel();
        }
    }

    /// Enter/Space key down synthesizes a primary pointer press at a fixed
    /// coordinate. Auto-repeat key downs are ignored while pressed.
    pub fn key_down(&mut self, key: &str, now: u64) -> Vec<GestureEvent> {
        if !matches!(key, "Enter" | " ") || self.key_pressed {
            return self.tick(now);
        }
        self.key_pressed = true;
        self.pointer_down(KEYBOARD_POINTER_COORD, KEYBOARD_POINTER_COORD, now)
    }

    /// Key up synthesizes the matching pointer release.
    pub fn key_up(&mut self, key: &str, now: u64) -> Vec<GestureEvent> {
        if !matches!(key, "Enter" | " ") || !self.key_pressed {
            return self.tick(now);
        }
        self.key_pressed = false;
        self.pointer_up(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;

    fn slots(events: &[GestureEvent]) -> Vec<ActionSlot> {
        events.iter().map(|event| event.slot).collect()
    }

    /// Drive a full press-release cycle and collect everything fired,
    /// ticking through any post-release window.
    fn press_release(classifier: &mut GestureClassifier, down: u64, up: u64) -> Vec<ActionSlot> {
        let mut events = classifier.pointer_down(10.0, 10.0, down);
        events.extend(classifier.tick(up));
        events.extend(classifier.pointer_up(up));
        while let Some(deadline) = classifier.next_deadline() {
            events.extend(classifier.tick(deadline));
        }
        slots(&events)
    }

    #[test]
    fn test_quick_press_is_exactly_one_tap() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        assert_eq!(press_release(&mut classifier, 0, 100), vec![ActionSlot::Tap]);
        assert!(!classifier.is_pressed());
    }

    #[test]
    fn test_small_movement_still_taps() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        let mut events = classifier.pointer_down(10.0, 10.0, 0);
        events.extend(classifier.pointer_move(14.0, 12.0, 50));
        events.extend(classifier.pointer_up(100));
        assert_eq!(slots(&events), vec![ActionSlot::Tap]);
    }

    #[test]
    fn test_press_past_hold_time_is_exactly_one_hold() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        let events = press_release(&mut classifier, 0, HOLD_TIME_MS + 50);
        assert_eq!(events, vec![ActionSlot::Hold]);
    }

    #[test]
    fn test_hold_fires_at_the_deadline_not_release() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        assert!(classifier.pointer_down(0.0, 0.0, 0).is_empty());
        assert_eq!(classifier.next_deadline(), Some(HOLD_TIME_MS));
        assert!(classifier.tick(HOLD_TIME_MS - 1).is_empty());
        let events = classifier.tick(HOLD_TIME_MS);
        assert_eq!(slots(&events), vec![ActionSlot::Hold]);
        assert!(classifier.pointer_up(HOLD_TIME_MS + 200).is_empty());
    }

    #[test]
    fn test_repeat_hold_refires_the_tap_slot() {
        let config = GestureConfig {
            hold_repeats: true,
            ..GestureConfig::default()
        };
        let mut classifier = GestureClassifier::new(config);
        classifier.pointer_down(0.0, 0.0, 0);
        let first = classifier.tick(HOLD_TIME_MS);
        assert_eq!(slots(&first), vec![ActionSlot::Tap]);
        let repeats = classifier.tick(HOLD_TIME_MS + 2 * REPEAT_DELAY_MS);
        assert_eq!(slots(&repeats), vec![ActionSlot::Tap, ActionSlot::Tap]);
        assert!(classifier.pointer_up(HOLD_TIME_MS + 250).is_empty());
        assert_eq!(classifier.next_deadline(), None);
    }

    #[test]
    fn test_two_presses_in_window_are_one_double_tap() {
        let config = GestureConfig {
            has_double_tap: true,
            ..GestureConfig::default()
        };
        let mut classifier = GestureClassifier::new(config);
        let mut events = classifier.pointer_down(0.0, 0.0, 0);
        events.extend(classifier.pointer_up(50));
        events.extend(classifier.pointer_down(0.0, 0.0, 120));
        events.extend(classifier.pointer_up(170));
        assert_eq!(slots(&events), vec![ActionSlot::DoubleTap]);
        assert_eq!(classifier.next_deadline(), None);
    }

    #[test]
    fn test_spaced_presses_are_two_taps() {
        let config = GestureConfig {
            has_double_tap: true,
            ..GestureConfig::default()
        };
        let mut classifier = GestureClassifier::new(config);
        let first = press_release(&mut classifier, 0, 50);
        let second = press_release(&mut classifier, 1000, 1050);
        assert_eq!(first, vec![ActionSlot::Tap]);
        assert_eq!(second, vec![ActionSlot::Tap]);
    }

    #[test]
    fn test_tap_without_double_tap_bound_fires_immediately() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        classifier.pointer_down(0.0, 0.0, 0);
        let events = classifier.pointer_up(50);
        assert_eq!(slots(&events), vec![ActionSlot::Tap]);
    }

    #[test]
    fn test_second_pointer_routes_to_multi_variants() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        classifier.pointer_down(0.0, 0.0, 0);
        classifier.pointer_down(20.0, 0.0, 10);
        let mut events = classifier.pointer_up(60);
        assert!(events.is_empty());
        events = classifier.pointer_up(70);
        assert_eq!(slots(&events), vec![ActionSlot::MultiTap]);
    }

    #[test]
    fn test_multi_hold() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        classifier.pointer_down(0.0, 0.0, 0);
        classifier.pointer_down(20.0, 0.0, 10);
        let events = classifier.tick(HOLD_TIME_MS + 10);
        assert_eq!(slots(&events), vec![ActionSlot::MultiHold]);
    }

    #[test]
    fn test_drag_is_rate_limited_with_incremental_deltas() {
        let config = GestureConfig {
            has_drag: true,
            drag_delay: 100,
            ..GestureConfig::default()
        };
        let mut classifier = GestureClassifier::new(config);
        classifier.pointer_down(0.0, 0.0, 0);
        let first = classifier.pointer_move(5.0, 0.0, 10);
        assert_eq!(slots(&first), vec![ActionSlot::Drag]);
        assert_eq!(first[0].snapshot.delta_x, 5.0);
        // Inside the rate limit window: movement accumulates, nothing fires.
        assert!(classifier.pointer_move(8.0, 1.0, 50).is_empty());
        assert!(classifier.pointer_move(12.0, 2.0, 90).is_empty());
        // Next firing carries the accumulated delta since the last one.
        let second = classifier.pointer_move(15.0, 2.0, 120);
        assert_eq!(slots(&second), vec![ActionSlot::Drag]);
        assert_eq!(second[0].snapshot.delta_x, 10.0);
        assert_eq!(second[0].snapshot.delta_y, 2.0);
        // A dragged session never fires a tap on release.
        assert!(classifier.pointer_up(150).is_empty());
    }

    #[test]
    fn test_drag_suppresses_hold() {
        let config = GestureConfig {
            has_drag: true,
            ..GestureConfig::default()
        };
        let mut classifier = GestureClassifier::new(config);
        classifier.pointer_down(0.0, 0.0, 0);
        classifier.pointer_move(40.0, 0.0, 100);
        let events = classifier.tick(HOLD_TIME_MS + 10);
        assert!(events.is_empty());
        assert!(classifier.pointer_up(HOLD_TIME_MS + 50).is_empty());
    }

    #[test]
    fn test_vertical_swipe_suppresses_tap_on_horizontal_slider() {
        let config = GestureConfig {
            suppress_vertical_swipe: true,
            ..GestureConfig::default()
        };
        let mut classifier = GestureClassifier::new(config);
        classifier.pointer_down(0.0, 0.0, 0);
        classifier.pointer_move(2.0, SWIPE_SENSITIVITY_PX + 10.0, 50);
        assert!(classifier.pointer_up(80).is_empty());
    }

    #[test]
    fn test_momentary_replaces_tap_and_hold() {
        let config = GestureConfig {
            momentary: true,
            ..GestureConfig::default()
        };
        let mut classifier = GestureClassifier::new(config);
        let start = classifier.pointer_down(0.0, 0.0, 0);
        assert_eq!(slots(&start), vec![ActionSlot::MomentaryStart]);
        // No hold deadline in momentary mode.
        assert_eq!(classifier.next_deadline(), None);
        let end = classifier.pointer_up(2500);
        assert_eq!(slots(&end), vec![ActionSlot::MomentaryEnd]);
        assert!((end[0].snapshot.hold_secs - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cancel_clears_the_session() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        classifier.pointer_down(0.0, 0.0, 0);
        classifier.cancel();
        assert!(!classifier.is_pressed());
        assert!(classifier.tick(HOLD_TIME_MS + 10).is_empty());
        assert!(classifier.pointer_up(HOLD_TIME_MS + 20).is_empty());
    }

    #[test]
    fn test_mouse_leave_cancels_touch_leave_does_not() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        classifier.pointer_down(0.0, 0.0, 0);
        classifier.pointer_leave(false);
        assert!(classifier.is_pressed());
        classifier.pointer_leave(true);
        assert!(!classifier.is_pressed());
    }

    #[test]
    fn test_keyboard_parity_synthesizes_press() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        assert!(classifier.key_down("Enter", 0).is_empty());
        // OS auto-repeat while held is ignored.
        assert!(classifier.key_down("Enter", 30).is_empty());
        assert!(classifier.key_down("Enter", 60).is_empty());
        let events = classifier.key_up("Enter", 100);
        assert_eq!(slots(&events), vec![ActionSlot::Tap]);
    }

    #[test]
    fn test_multi_double_tap_window_override_governs_multi_presses() {
        let config = GestureConfig {
            has_multi_double_tap: true,
            multi_double_tap_window: 400,
            ..GestureConfig::default()
        };
        let mut classifier = GestureClassifier::new(config);
        classifier.pointer_down(0.0, 0.0, 0);
        classifier.pointer_down(20.0, 0.0, 10);
        classifier.pointer_up(50);
        assert!(classifier.pointer_up(60).is_empty());
        // The multi window, not the single one, arms the wait.
        assert_eq!(classifier.next_deadline(), Some(60 + 400));
        let events = classifier.tick(60 + 400);
        assert_eq!(slots(&events), vec![ActionSlot::MultiTap]);
    }

    #[test]
    fn test_multi_double_tap_window_read_from_its_own_slot() {
        let element = ElementConfig {
            multi_double_tap_action: Some(Action {
                double_tap_window: Some(450),
                ..Action::key("BACK")
            }),
            ..ElementConfig::default()
        };
        let config = GestureConfig::from_element(&element);
        assert_eq!(config.multi_double_tap_window, 450);
        // The single window keeps its default.
        assert_eq!(config.double_tap_window, DOUBLE_TAP_WINDOW_MS);
        assert!(config.has_multi_double_tap);
    }

    #[test]
    fn test_config_from_element_reads_slot_overrides() {
        let element = ElementConfig {
            hold_action: Some(Action {
                hold_time: Some(700),
                repeat_delay: Some(150),
                ..Action::repeat()
            }),
            double_tap_action: Some(Action {
                double_tap_window: Some(300),
                ..Action::key("BACK")
            }),
            ..ElementConfig::default()
        };
        let config = GestureConfig::from_element(&element);
        assert_eq!(config.hold_time, 700);
        assert_eq!(config.multi_hold_time, 700);
        assert_eq!(config.double_tap_window, 300);
        // Without its own override the multi window follows the single one.
        assert_eq!(config.multi_double_tap_window, 300);
        assert_eq!(config.repeat_delay, 150);
        assert!(config.hold_repeats);
        assert!(config.has_double_tap);
        assert!(!config.momentary);
    }
}
