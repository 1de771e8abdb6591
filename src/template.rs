//! Template renderer seam and deep action rendering.
//!
//! The templating-expression evaluator itself is an external collaborator:
//! the engine only knows that a string may carry template markers and that a
//! renderer turns such a string plus a context into a value. Everything
//! template-shaped funnels through [`render_value`], which catches renderer
//! errors and degrades to an empty string so a malformed template can never
//! crash an interaction.

use anyhow::Result;
use serde_json::{Number, Value};
use tracing::{error, warn};

use crate::models::Action;

/// Context exposed to template expressions.
///
/// Mirrors what the card makes available: the current displayed value, the
/// hold duration of the gesture being dispatched, the unit, the raw pointer
/// coordinates and per-frame deltas, and the full resolved element config
/// for self-referential templates.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Current displayed value of the owning element.
    pub value: Option<Value>,
    /// Seconds between momentary press start and end, `0.0` outside a
    /// momentary dispatch.
    pub hold_secs: f64,
    /// Unit of measurement of the displayed value.
    pub unit: String,
    /// Pointer-down X coordinate.
    pub initial_x: Option<f64>,
    /// Pointer-down Y coordinate.
    pub initial_y: Option<f64>,
    /// Latest pointer X coordinate.
    pub current_x: Option<f64>,
    /// Latest pointer Y coordinate.
    pub current_y: Option<f64>,
    /// Per-frame pointer X delta (incremental, not cumulative).
    pub delta_x: Option<f64>,
    /// Per-frame pointer Y delta (incremental, not cumulative).
    pub delta_y: Option<f64>,
    /// The resolved element config, serialized, for self-referential
    /// templates.
    pub config: Value,
}

/// The black-box template evaluator provided by the host.
pub trait TemplateRenderer {
    /// Whether `input` contains template markers at all. Marker-free input
    /// must pass through [`TemplateRenderer::render`] unchanged.
    fn has_template(&self, input: &str) -> bool;

    /// Evaluate `input` against `ctx`. Errors are caught by the engine and
    /// degrade to an empty string.
    fn render(&self, input: &str, ctx: &RenderContext) -> Result<Value>;
}

/// A renderer for hosts without a template engine: nothing is ever treated
/// as a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRenderer;

impl TemplateRenderer for PassthroughRenderer {
    fn has_template(&self, _input: &str) -> bool {
        false
    }

    fn render(&self, input: &str, _ctx: &RenderContext) -> Result<Value> {
        Ok(Value::String(input.to_string()))
    }
}

/// Render one possibly-templated value. Non-strings and marker-free strings
/// pass through unchanged; renderer errors are logged and become an empty
/// string.
pub fn render_value<R: TemplateRenderer>(renderer: &R, input: &Value, ctx: &RenderContext) -> Value {
    let Value::String(text) = input else {
        return input.clone();
    };
    if !renderer.has_template(text) {
        return input.clone();
    }
    match renderer.render(text, ctx) {
        Ok(rendered) => rendered,
        Err(err) => {
            error!("template render failed for {text:?}: {err:#}");
            Value::String(String::new())
        }
    }
}

/// Render a possibly-templated string field down to a plain string.
pub fn render_string<R: TemplateRenderer>(renderer: &R, input: &str, ctx: &RenderContext) -> String {
    match render_value(renderer, &Value::String(input.to_string()), ctx) {
        Value::String(s) => s,
        other => stringify(&other),
    }
}

/// Deep-render every template-bearing field of an action.
///
/// Fields whose key ends in `data` or `target` that render to a string are
/// further parsed as YAML/JSON, so templates can produce whole mappings
/// rather than just scalars. If the rendered result no longer fits the
/// action shape the pre-render action is kept and the mismatch logged.
pub fn deep_render_action<R: TemplateRenderer>(
    renderer: &R,
    action: &Action,
    ctx: &RenderContext,
) -> Action {
    let Ok(mut value) = serde_json::to_value(action) else {
        // Action is a plain data struct; serialization cannot fail.
        return action.clone();
    };
    deep_render(renderer, &mut value, ctx, None);
    match serde_json::from_value(value) {
        Ok(rendered) => rendered,
        Err(err) => {
            warn!(
                "rendered action no longer matches the action shape ({err}); \
                 using the unrendered action"
            );
            action.clone()
        }
    }
}

fn deep_render<R: TemplateRenderer>(
    renderer: &R,
    value: &mut Value,
    ctx: &RenderContext,
    key: Option<&str>,
) {
    match value {
        Value::Object(map) => {
            for (k, v) in map.iter_mut() {
                deep_render(renderer, v, ctx, Some(k));
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                deep_render(renderer, item, ctx, key);
            }
        }
        Value::String(_) => {
            let mut rendered = render_value(renderer, value, ctx);
            if let (Some(key), Value::String(text)) = (key, &rendered) {
                if key.ends_with("data") || key.ends_with("target") {
                    rendered = parse_structured(text).unwrap_or(rendered);
                }
            }
            *value = rendered;
        }
        _ => {}
    }
}

/// Parse a string that should hold structured data. YAML is a superset of
/// JSON, so one parser covers both.
fn parse_structured(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_yml::from_str::<Value>(text) {
        Ok(parsed @ (Value::Object(_) | Value::Array(_))) => Some(parsed),
        Ok(_) => None,
        Err(err) => {
            warn!("templated data/target is not valid YAML/JSON: {err}");
            None
        }
    }
}

/// Best-effort display form of a rendered value.
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Coerce a rendered value to a number when possible.
#[must_use]
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Build a JSON number from a float, collapsing to an integer when whole.
#[must_use]
pub fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::Number(Number::from(value as i64))
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}
