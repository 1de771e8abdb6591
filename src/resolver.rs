//! Config Resolver: merges element configs with card defaults and the
//! platform catalog into dispatch-ready elements.
//!
//! Precedence per field: explicit element value, then the named default
//! from the platform catalog, then the card-level default. The resolver
//! never mutates its input; it produces derived copies, so resolving an
//! already fully specified element returns it unchanged.

use serde_json::Value;

use crate::catalog;
use crate::config::CardConfig;
use crate::models::{
    ActionKind, ActionSlot, Direction, ElementConfig, ElementType, StringOrList, TargetConfig,
};
use crate::template::{render_string, RenderContext, TemplateRenderer};

/// Direction sub-configs nest exactly one level below the pad element.
const MAX_DIRECTION_DEPTH: u8 = 1;

/// Resolves element configs against one card configuration.
pub struct Resolver<'a, R: TemplateRenderer> {
    card: &'a CardConfig,
    renderer: &'a R,
    /// Custom actions loaded from the card's `custom_actions_file`, applied
    /// after the inline `custom_actions` list.
    file_actions: &'a [ElementConfig],
}

impl<'a, R: TemplateRenderer> Resolver<'a, R> {
    /// A resolver over `card`, with `file_actions` loaded separately via
    /// [`crate::config::fetch_custom_actions`].
    pub fn new(card: &'a CardConfig, renderer: &'a R, file_actions: &'a [ElementConfig]) -> Self {
        Self {
            card,
            renderer,
            file_actions,
        }
    }

    /// The element config for a layout name: the first matching custom
    /// action (inline list before file list), else the platform catalog
    /// default, else an empty spacer config.
    ///
    /// The result always resolves every present action slot to a concrete
    /// kind; a missing element yields an empty config whose slots resolve
    /// to nothing, which dispatch treats as `none`.
    #[must_use]
    pub fn element_config(&self, name: &str) -> ElementConfig {
        let custom = self
            .card
            .custom_actions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .chain(self.file_actions.iter())
            .find(|element| element.name.as_deref() == Some(name));

        if let Some(custom) = custom {
            let autofill = custom
                .autofill_entity_id
                .or(self.card.autofill_entity_id)
                .unwrap_or(true);
            if autofill {
                return self.resolve(custom);
            }
            return custom.clone();
        }

        let platform = self.card.platform();
        match catalog::catalog(platform).lookup(name) {
            Some(default) => self.resolve(default),
            None => ElementConfig::default(),
        }
    }

    /// Merge card defaults into an element config: id autofill per action
    /// slot, target inference for `perform-action`, global timing windows,
    /// element entity fallback, and one level of direction recursion.
    #[must_use]
    pub fn resolve(&self, element: &ElementConfig) -> ElementConfig {
        self.resolve_at(element, 0)
    }

    fn resolve_at(&self, element: &ElementConfig, depth: u8) -> ElementConfig {
        if element.is_empty() {
            return element.clone();
        }

        let mut resolved = element.clone();
        let ctx = self.render_context(element);

        for slot in ActionSlot::ALL {
            if let Some(action) = resolved.slot_mut(slot).as_mut() {
                self.autofill_action(action, element, &ctx);
            }
        }

        // Card-wide haptics default.
        resolved.haptics = resolved
            .haptics
            .or(self.card.haptics)
            .or(Some(true));

        self.merge_timing_windows(&mut resolved);
        self.fill_element_entity(&mut resolved, &ctx);

        if resolved.is_pad() && depth < MAX_DIRECTION_DEPTH {
            for direction in Direction::ALL {
                let mut child = resolved
                    .direction(direction)
                    .cloned()
                    .unwrap_or_default();
                child.entity_id = resolved.entity_id.clone();
                child.value_attribute = resolved.value_attribute.clone();
                let child = self.resolve_at(&child, depth + 1);
                *resolved.direction_mut(direction) = Some(Box::new(child));
            }
        }

        resolved
    }

    /// The resolver-time render context: card config plus the element's
    /// rendered entity and attribute.
    fn render_context(&self, element: &ElementConfig) -> RenderContext {
        let entity_source = element
            .entity_id
            .as_deref()
            .or(self.card.remote_id.as_deref())
            .or(self.card.media_player_id.as_deref())
            .or(self.card.keyboard_id.as_deref())
            .unwrap_or_default();
        let attribute_source = element.value_attribute.as_deref().unwrap_or("state");

        let mut config = serde_json::to_value(self.card).unwrap_or(Value::Null);
        let base = RenderContext::default();
        let entity = render_string(self.renderer, entity_source, &base);
        let attribute = render_string(self.renderer, attribute_source, &base);
        if let Value::Object(map) = &mut config {
            map.insert("entity".to_string(), Value::String(entity));
            map.insert("attribute".to_string(), Value::String(attribute));
        }
        RenderContext {
            config,
            ..RenderContext::default()
        }
    }

    /// Fill card-level ids and platform into one action, per its kind.
    fn autofill_action(
        &self,
        action: &mut crate::models::Action,
        element: &ElementConfig,
        ctx: &RenderContext,
    ) {
        match action.action {
            ActionKind::Keyboard | ActionKind::Textbox | ActionKind::Search => {
                if action.keyboard_id.is_none() {
                    action.keyboard_id = self
                        .card
                        .keyboard_id
                        .clone()
                        .or_else(|| self.card.remote_id.clone())
                        .or_else(|| self.card.media_player_id.clone());
                }
                self.fill_platform_ids(action);
            }
            ActionKind::Key | ActionKind::Source => {
                self.fill_platform_ids(action);
            }
            ActionKind::PerformAction => {
                self.infer_perform_action_target(action, element, ctx);
            }
            _ => {}
        }
    }

    fn fill_platform_ids(&self, action: &mut crate::models::Action) {
        if action.remote_id.is_none() {
            action.remote_id = self.card.remote_id.clone();
        }
        if action.media_player_id.is_none() {
            action.media_player_id = self.card.media_player_id.clone();
        }
        if action.device.is_none() {
            action.device = self.card.device.clone();
        }
        if action.platform.is_none() {
            action.platform = self.card.platform;
        }
    }

    /// Infer a `perform-action` target from the service's domain prefix
    /// when no explicit target is set.
    fn infer_perform_action_target(
        &self,
        action: &mut crate::models::Action,
        element: &ElementConfig,
        ctx: &RenderContext,
    ) {
        // A template target counts as explicit even before it renders.
        let has_target = action.target.as_ref().is_some_and(|target| match target {
            TargetConfig::Structured(t) => !t.is_empty(),
            TargetConfig::Template(_) => true,
        });
        if has_target {
            return;
        }

        let service = render_string(
            self.renderer,
            action.perform_action.as_deref().unwrap_or_default(),
            ctx,
        );
        let domain = service.split('.').next().unwrap_or_default();
        let entity = render_string(
            self.renderer,
            element.entity_id.as_deref().unwrap_or_default(),
            ctx,
        );

        let mut target = action
            .target
            .as_ref()
            .and_then(TargetConfig::structured)
            .cloned()
            .unwrap_or_default();
        match domain {
            "remote" => {
                target.entity_id = if entity.starts_with("remote") {
                    element.entity_id.as_deref().map(StringOrList::from)
                } else {
                    self.card.remote_id.as_deref().map(StringOrList::from)
                };
            }
            "media_player" | "androidtv" | "kodi" | "denonavr" | "webostv" => {
                target.entity_id = if entity.starts_with("media_player") {
                    element.entity_id.as_deref().map(StringOrList::from)
                } else {
                    self.card.media_player_id.as_deref().map(StringOrList::from)
                };
            }
            "unified_remote" => {
                // Unified Remote addresses devices through data, not target.
                let device = self
                    .card
                    .device
                    .clone()
                    .or_else(|| self.card.remote_id.clone())
                    .or_else(|| self.card.media_player_id.clone())
                    .or_else(|| self.card.keyboard_id.clone());
                if let Some(device) = device {
                    let data = action
                        .data
                        .get_or_insert_with(|| Value::Object(serde_json::Map::new()));
                    if let Value::Object(map) = data {
                        map.entry("target".to_string())
                            .or_insert(Value::String(device));
                    }
                }
                return;
            }
            _ => {
                target.entity_id = element.entity_id.as_deref().map(StringOrList::from);
            }
        }
        if !target.is_empty() {
            action.target = Some(target.into());
        }
    }

    /// Apply card-wide timing windows to the slots they govern.
    fn merge_timing_windows(&self, resolved: &mut ElementConfig) {
        if let Some(window) = self.card.double_tap_window {
            for slot in [ActionSlot::DoubleTap, ActionSlot::MultiDoubleTap] {
                if let Some(action) = resolved.slot_mut(slot).as_mut() {
                    action.double_tap_window.get_or_insert(window);
                }
            }
        }
        if let Some(hold_time) = self.card.hold_time {
            for slot in [ActionSlot::Hold, ActionSlot::MultiHold] {
                if let Some(action) = resolved.slot_mut(slot).as_mut() {
                    action.hold_time.get_or_insert(hold_time);
                }
            }
        }
        if let Some(repeat_delay) = self.card.repeat_delay {
            for slot in [ActionSlot::Hold, ActionSlot::MultiHold] {
                if let Some(action) = resolved.slot_mut(slot).as_mut() {
                    if action.action == ActionKind::Repeat {
                        action.repeat_delay.get_or_insert(repeat_delay);
                    }
                }
            }
        }
    }

    /// Fill the element's own entity id from its tap target or the card
    /// defaults. A slider named "slider" prefers the media player.
    fn fill_element_entity(&self, resolved: &mut ElementConfig, ctx: &RenderContext) {
        if resolved.entity_id.is_some() {
            return;
        }
        let name = render_string(
            self.renderer,
            resolved.name.as_deref().unwrap_or_default(),
            ctx,
        );
        if resolved.element_type == ElementType::Slider && name == "slider" {
            resolved.entity_id = self.card.media_player_id.clone();
            return;
        }
        resolved.entity_id = resolved
            .tap_action
            .as_ref()
            .and_then(|tap| tap.target.as_ref())
            .and_then(TargetConfig::structured)
            .and_then(|target| target.entity_id.as_ref())
            .and_then(|ids| ids.first())
            .map(str::to_string)
            .or_else(|| self.card.remote_id.clone())
            .or_else(|| self.card.media_player_id.clone())
            .or_else(|| self.card.keyboard_id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, Platform, Target};
    use crate::template::PassthroughRenderer;

    fn card() -> CardConfig {
        CardConfig {
            platform: Some(Platform::AndroidTv),
            remote_id: Some("remote.living_room".to_string()),
            media_player_id: Some("media_player.living_room".to_string()),
            keyboard_id: Some("remote.keyboard".to_string()),
            ..CardConfig::default()
        }
    }

    #[test]
    fn test_key_action_autofills_ids_and_platform() {
        let card = card();
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let element = ElementConfig {
            tap_action: Some(Action::key("DPAD_UP")),
            ..ElementConfig::named(ElementType::Button, "up")
        };
        let resolved = resolver.resolve(&element);
        let tap = resolved.tap_action.unwrap();
        assert_eq!(tap.remote_id.as_deref(), Some("remote.living_room"));
        assert_eq!(
            tap.media_player_id.as_deref(),
            Some("media_player.living_room")
        );
        assert_eq!(tap.platform, Some(Platform::AndroidTv));
        // Element entity falls back to the remote id.
        assert_eq!(resolved.entity_id.as_deref(), Some("remote.living_room"));
    }

    #[test]
    fn test_perform_action_target_inferred_from_domain() {
        let card = card();
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);

        let mut action = Action::new(ActionKind::PerformAction);
        action.perform_action = Some("remote.send_command".to_string());
        let element = ElementConfig {
            tap_action: Some(action),
            ..ElementConfig::named(ElementType::Button, "custom")
        };
        let resolved = resolver.resolve(&element);
        let target = resolved.tap_action.unwrap().target.unwrap();
        let target = target.structured().unwrap();
        assert_eq!(
            target.entity_id.as_ref().unwrap().first(),
            Some("remote.living_room")
        );

        let mut action = Action::new(ActionKind::PerformAction);
        action.perform_action = Some("kodi.call_method".to_string());
        let element = ElementConfig {
            tap_action: Some(action),
            ..ElementConfig::named(ElementType::Button, "custom")
        };
        let target = resolver
            .resolve(&element)
            .tap_action
            .unwrap()
            .target
            .unwrap();
        let target = target.structured().unwrap();
        assert_eq!(
            target.entity_id.as_ref().unwrap().first(),
            Some("media_player.living_room")
        );
    }

    #[test]
    fn test_perform_action_keeps_explicit_target() {
        let card = card();
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let mut action = Action::new(ActionKind::PerformAction);
        action.perform_action = Some("remote.send_command".to_string());
        action.target = Some(
            Target {
                entity_id: Some(StringOrList::from("remote.other")),
                ..Target::default()
            }
            .into(),
        );
        let element = ElementConfig {
            tap_action: Some(action),
            ..ElementConfig::named(ElementType::Button, "custom")
        };
        let target = resolver
            .resolve(&element)
            .tap_action
            .unwrap()
            .target
            .unwrap();
        let target = target.structured().unwrap();
        assert_eq!(
            target.entity_id.as_ref().unwrap().first(),
            Some("remote.other")
        );
    }

    #[test]
    fn test_own_entity_used_when_it_matches_the_domain() {
        let card = card();
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let mut action = Action::new(ActionKind::PerformAction);
        action.perform_action = Some("media_player.media_play".to_string());
        let element = ElementConfig {
            entity_id: Some("media_player.bedroom".to_string()),
            tap_action: Some(action),
            ..ElementConfig::named(ElementType::Button, "custom")
        };
        let target = resolver
            .resolve(&element)
            .tap_action
            .unwrap()
            .target
            .unwrap();
        let target = target.structured().unwrap();
        assert_eq!(
            target.entity_id.as_ref().unwrap().first(),
            Some("media_player.bedroom")
        );
    }

    #[test]
    fn test_global_timing_windows_merge_into_slots() {
        let card = CardConfig {
            hold_time: Some(700),
            double_tap_window: Some(300),
            repeat_delay: Some(150),
            ..card()
        };
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let element = ElementConfig {
            hold_action: Some(Action::repeat()),
            double_tap_action: Some(Action::key("BACK")),
            ..ElementConfig::named(ElementType::Button, "back")
        };
        let resolved = resolver.resolve(&element);
        let hold = resolved.hold_action.unwrap();
        assert_eq!(hold.hold_time, Some(700));
        assert_eq!(hold.repeat_delay, Some(150));
        assert_eq!(resolved.double_tap_action.unwrap().double_tap_window, Some(300));
    }

    #[test]
    fn test_per_slot_override_beats_card_timing() {
        let card = CardConfig {
            hold_time: Some(700),
            ..card()
        };
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let element = ElementConfig {
            hold_action: Some(Action {
                hold_time: Some(400),
                ..Action::key("BACK")
            }),
            ..ElementConfig::named(ElementType::Button, "back")
        };
        let resolved = resolver.resolve(&element);
        assert_eq!(resolved.hold_action.unwrap().hold_time, Some(400));
    }

    #[test]
    fn test_slider_named_slider_prefers_media_player() {
        let card = card();
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let element = ElementConfig {
            tap_action: Some(Action::new(ActionKind::PerformAction)),
            ..ElementConfig::named(ElementType::Slider, "slider")
        };
        let resolved = resolver.resolve(&element);
        assert_eq!(
            resolved.entity_id.as_deref(),
            Some("media_player.living_room")
        );
    }

    #[test]
    fn test_directions_inherit_entity_and_resolve_one_level() {
        let card = card();
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let element = ElementConfig {
            entity_id: Some("remote.pad".to_string()),
            value_attribute: Some("state".to_string()),
            tap_action: Some(Action::key("DPAD_CENTER")),
            up: Some(Box::new(ElementConfig {
                tap_action: Some(Action::key("DPAD_UP")),
                ..ElementConfig::default()
            })),
            ..ElementConfig::named(ElementType::Touchpad, "touchpad")
        };
        let resolved = resolver.resolve(&element);
        let up = resolved.direction(Direction::Up).unwrap();
        assert_eq!(up.entity_id.as_deref(), Some("remote.pad"));
        assert_eq!(
            up.tap_action.as_ref().unwrap().remote_id.as_deref(),
            Some("remote.living_room")
        );
        // A direction child never grows its own direction children.
        assert!(up.direction(Direction::Up).is_none());
        // Missing directions materialize as resolved empty children.
        assert!(resolved.direction(Direction::Down).is_some());
    }

    #[test]
    fn test_resolution_is_idempotent_for_explicit_elements() {
        let card = card();
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let element = ElementConfig {
            tap_action: Some(Action::key("DPAD_UP")),
            ..ElementConfig::named(ElementType::Button, "up")
        };
        let once = resolver.resolve(&element);
        let twice = resolver.resolve(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_actions_override_catalog_defaults() {
        let card = CardConfig {
            custom_actions: Some(vec![ElementConfig {
                tap_action: Some(Action::key("CUSTOM_POWER")),
                ..ElementConfig::named(ElementType::Button, "power")
            }]),
            ..card()
        };
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let element = resolver.element_config("power");
        assert_eq!(
            element.tap_action.as_ref().unwrap().key.as_deref(),
            Some("CUSTOM_POWER")
        );
    }

    #[test]
    fn test_autofill_false_skips_resolution() {
        let card = CardConfig {
            custom_actions: Some(vec![ElementConfig {
                autofill_entity_id: Some(false),
                tap_action: Some(Action::key("CUSTOM")),
                ..ElementConfig::named(ElementType::Button, "raw")
            }]),
            ..card()
        };
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let element = resolver.element_config("raw");
        assert!(element.tap_action.as_ref().unwrap().remote_id.is_none());
        assert!(element.entity_id.is_none());
    }

    #[test]
    fn test_unknown_name_yields_empty_spacer() {
        let card = card();
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        assert!(resolver.element_config("does_not_exist").is_empty());
    }

    #[test]
    fn test_catalog_defaults_resolve_for_the_card_platform() {
        let card = card();
        let renderer = PassthroughRenderer;
        let resolver = Resolver::new(&card, &renderer, &[]);
        let element = resolver.element_config("up");
        let tap = element.tap_action.unwrap();
        assert_eq!(tap.key.as_deref(), Some("DPAD_UP"));
        assert_eq!(tap.remote_id.as_deref(), Some("remote.living_room"));
    }

    #[test]
    fn test_file_actions_matched_after_inline_customs() {
        let card = card();
        let renderer = PassthroughRenderer;
        let file_actions = vec![ElementConfig {
            tap_action: Some(Action::key("FROM_FILE")),
            ..ElementConfig::named(ElementType::Button, "file_button")
        }];
        let resolver = Resolver::new(&card, &renderer, &file_actions);
        let element = resolver.element_config("file_button");
        assert_eq!(
            element.tap_action.as_ref().unwrap().key.as_deref(),
            Some("FROM_FILE")
        );
    }
}
