//! Displayed value derivation and feedback.
//!
//! An element's displayed value comes from its entity's state or one of its
//! attributes, with derived computation for a few special attributes
//! (brightness rescale, extrapolated media position, timer elapsed time).
//! The [`ValueTracker`] layers the post-action suppression window on top:
//! after a user action the backend value is ignored for a short delay so
//! optimistic local state does not flicker against a stale backend.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

use crate::constants::{
    SLIDER_STEP_COUNT, UPDATE_AFTER_ACTION_DELAY_MS, VALUE_REFRESH_INTERVAL_MS,
};
use crate::models::{entity_domain, EntityState};
use crate::template::{as_f64, number};

/// Matches a trailing `[N]` index on an attribute path.
fn index_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*)\[(\d+)\]$").expect("static pattern"))
}

/// Derive the displayed value of `entity` for `attribute` at wall-clock
/// `now`.
///
/// `"state"` yields the literal state string. A trailing `[N]` plucks one
/// element from a list-valued attribute. `brightness`, `media_position`,
/// and `elapsed` get derived computation; everything else is the raw
/// attribute value.
#[must_use]
pub fn compute_value(entity: &EntityState, attribute: &str, now: DateTime<Utc>) -> Option<Value> {
    if attribute == "state" {
        return Some(Value::String(entity.state.clone()));
    }

    if let Some(captures) = index_suffix().captures(attribute) {
        let base = captures.get(1).map_or("", |m| m.as_str());
        let index: usize = captures
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        return match entity.attribute(base) {
            Some(Value::Array(items)) => items.get(index).cloned(),
            other => other.cloned(),
        };
    }

    match attribute {
        "brightness" => {
            let raw = as_f64(entity.attribute("brightness")?)?;
            Some(number((raw / 255.0 * 100.0).round()))
        }
        "media_position" => Some(media_position(entity, now)),
        "elapsed" => timer_elapsed(entity, now),
        _ => entity.attribute(attribute).cloned(),
    }
}

/// Extrapolated media position: while playing, the recorded position plus
/// the time since it was recorded, clamped to the media duration.
fn media_position(entity: &EntityState, now: DateTime<Utc>) -> Value {
    let recorded = entity
        .attribute("media_position")
        .and_then(as_f64)
        .unwrap_or(0.0);
    if entity.state != "playing" {
        return number(recorded);
    }
    let elapsed = entity
        .attribute("media_position_updated_at")
        .and_then(|v| v.as_str())
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map_or(0.0, |updated_at| {
            (now - updated_at.with_timezone(&Utc)).num_milliseconds() as f64 / 1000.0
        });
    let duration = entity
        .attribute("media_duration")
        .and_then(as_f64)
        .unwrap_or(f64::MAX);
    number((recorded + elapsed.max(0.0)).clamp(0.0, duration))
}

/// Elapsed seconds of a timer entity, derived from its duration and either
/// the remaining time (paused) or the finish timestamp (active).
fn timer_elapsed(entity: &EntityState, now: DateTime<Utc>) -> Option<Value> {
    if entity_domain_of(entity) != Some("timer") {
        return entity.attribute("elapsed").cloned();
    }
    let duration = entity
        .attribute("duration")
        .and_then(|v| v.as_str())
        .and_then(parse_hms)?;
    let elapsed = match entity.state.as_str() {
        "idle" => 0.0,
        "paused" => {
            let remaining = entity
                .attribute("remaining")
                .and_then(|v| v.as_str())
                .and_then(parse_hms)
                .unwrap_or(duration);
            duration - remaining
        }
        _ => {
            let remaining = entity
                .attribute("finishes_at")
                .and_then(|v| v.as_str())
                .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                .map_or(0.0, |finishes_at| {
                    (finishes_at.with_timezone(&Utc) - now).num_milliseconds() as f64 / 1000.0
                });
            duration - remaining
        }
    };
    Some(number(elapsed.clamp(0.0, duration)))
}

/// Entity domain, when the tracker knows which entity the state came from.
/// Timer states carry their entity id in the `entity_id` attribute in some
/// hosts; the `duration`/`remaining` shape is the reliable signal.
fn entity_domain_of(entity: &EntityState) -> Option<&str> {
    entity
        .attribute("entity_id")
        .and_then(|v| v.as_str())
        .map(entity_domain)
        .or_else(|| entity.attribute("duration").map(|_| "timer"))
}

/// Parse a `H:MM:SS` style duration to seconds.
fn parse_hms(text: &str) -> Option<f64> {
    let mut seconds = 0.0;
    for part in text.split(':') {
        let value: f64 = part.parse().ok()?;
        seconds = seconds * 60.0 + value;
    }
    Some(seconds)
}

/// Whether `attribute` on this entity needs periodic recomputation while
/// the entity is live (playing media, running timer).
#[must_use]
pub fn is_time_derived(entity: &EntityState, attribute: &str) -> bool {
    match attribute {
        "media_position" => entity.state == "playing",
        "elapsed" => entity.state == "active",
        _ => false,
    }
}

/// Clamp a slider value into its configured range.
#[must_use]
pub fn clamp_to_range(value: f64, range: [f64; 2]) -> f64 {
    value.clamp(range[0], range[1])
}

/// The slider step when none is configured: one hundredth of the range.
#[must_use]
pub fn default_step(range: [f64; 2]) -> f64 {
    (range[1] - range[0]) / SLIDER_STEP_COUNT
}

/// Display decimal places implied by a slider step size (`0.1` → 1,
/// `0.25` → 2, whole steps → 0).
#[must_use]
pub fn step_precision(step: f64) -> usize {
    let text = format!("{step}");
    text.split_once('.').map_or(0, |(_, frac)| frac.len())
}

/// Owns one element's displayed value and the post-action suppression
/// window.
///
/// Pull-based: the host calls [`ValueTracker::refresh`] on state changes
/// and on its periodic tick (every [`VALUE_REFRESH_INTERVAL_MS`] while
/// [`is_time_derived`] says the value is live). There are no internal
/// timers to leak; dropping the tracker drops everything.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTracker {
    value: Option<Value>,
    attribute: String,
    suppress_until: Option<u64>,
    delay_ms: u64,
}

impl ValueTracker {
    /// A tracker for `attribute` with the given post-action suppression
    /// delay (the card or element `value_from_hass_delay`).
    #[must_use]
    pub fn new(attribute: &str, delay_ms: Option<u64>) -> Self {
        Self {
            value: None,
            attribute: attribute.to_string(),
            suppress_until: None,
            delay_ms: delay_ms.unwrap_or(UPDATE_AFTER_ACTION_DELAY_MS),
        }
    }

    /// The current displayed value.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Record a user action at `now_ms`: backend refreshes are ignored
    /// until the suppression delay elapses.
    pub fn begin_action(&mut self, now_ms: u64) {
        self.suppress_until = Some(now_ms + self.delay_ms);
    }

    /// Set an optimistic local value (slider thumb position during a drag).
    pub fn set_local(&mut self, value: Value) {
        self.value = Some(value);
    }

    /// Recompute the displayed value from backend state. Returns the value
    /// in effect afterwards. Suppressed while a recent action's delay has
    /// not elapsed.
    pub fn refresh(
        &mut self,
        entity: Option<&EntityState>,
        now_ms: u64,
        now: DateTime<Utc>,
    ) -> Option<&Value> {
        if let Some(until) = self.suppress_until {
            if now_ms < until {
                return self.value.as_ref();
            }
            self.suppress_until = None;
        }
        match entity {
            Some(entity) => {
                self.value = compute_value(entity, &self.attribute, now);
            }
            None => {
                warn!("no entity state to derive {} from", self.attribute);
                self.value = None;
            }
        }
        self.value.as_ref()
    }

    /// The host's refresh cadence for this entity, `None` when nothing is
    /// time-derived and state-change refreshes suffice.
    #[must_use]
    pub fn refresh_interval(&self, entity: Option<&EntityState>) -> Option<u64> {
        entity
            .is_some_and(|entity| is_time_derived(entity, &self.attribute))
            .then_some(VALUE_REFRESH_INTERVAL_MS)
    }

    /// Drop all transient state: the session ended or the attribute
    /// changed.
    pub fn reset(&mut self) {
        self.value = None;
        self.suppress_until = None;
    }
}
