//! Engine-wide timing windows and thresholds.
//!
//! Every value here is a default. Card-level configuration and per-slot
//! overrides take precedence over these constants.

/// Milliseconds a pointer must stay down before a press becomes a hold.
pub const HOLD_TIME_MS: u64 = 500;

/// Milliseconds after a tap during which a second tap upgrades it to a
/// double tap.
pub const DOUBLE_TAP_WINDOW_MS: u64 = 200;

/// Milliseconds between repeat fires while a `repeat` hold action is held
/// down, and between rate-limited drag action fires.
pub const REPEAT_DELAY_MS: u64 = 100;

/// Milliseconds to keep ignoring backend state after a user action, so the
/// optimistic local value does not flicker against stale backend state.
pub const UPDATE_AFTER_ACTION_DELAY_MS: u64 = 750;

/// Milliseconds to wait for an explicit confirmed signal after the generic
/// dialog-closed signal before resolving a confirmation as denied.
///
/// The race structure is the contract; the exact delay is tunable.
pub const CONFIRMATION_DENY_DELAY_MS: u64 = 100;

/// Pixels of orthogonal-axis movement beyond primary-axis movement before a
/// press on a horizontal slider is treated as a page swipe and suppressed.
pub const SWIPE_SENSITIVITY_PX: f64 = 50.0;

/// Pixels of total movement past which a press no longer qualifies as a
/// hold or tap.
pub const HOLD_MOVEMENT_THRESHOLD_PX: f64 = 10.0;

/// Milliseconds between refreshes of time-derived values (media position,
/// timer elapsed) while they are live.
pub const VALUE_REFRESH_INTERVAL_MS: u64 = 500;

/// Synthetic pointer coordinate used for keyboard-driven presses.
pub const KEYBOARD_POINTER_COORD: f64 = 1.0;

/// Number of steps a slider range is divided into when no explicit step is
/// configured.
pub const SLIDER_STEP_COUNT: f64 = 100.0;
