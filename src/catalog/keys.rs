//! Per-platform default key and source tables.
//!
//! Each platform maps the shared logical element names (`up`, `power`,
//! `volume_up`, the pad elements) onto its own command vocabulary. The
//! tables are merge bases: an explicit custom action with the same name
//! always wins.

use crate::models::{Action, ActionKind, ElementConfig, ElementType, Platform};

/// A plain key button.
fn key_button(name: &str, key: &str, icon: &str) -> ElementConfig {
    ElementConfig {
        icon: Some(icon.to_string()),
        tap_action: Some(Action::key(key)),
        ..ElementConfig::named(ElementType::Button, name)
    }
}

/// A key button that repeats while held (navigation and volume keys).
fn repeat_key_button(name: &str, key: &str, icon: &str) -> ElementConfig {
    ElementConfig {
        hold_action: Some(Action::repeat()),
        ..key_button(name, key, icon)
    }
}

/// A source-selection button.
fn source_button(name: &str, source: &str, icon: &str) -> ElementConfig {
    ElementConfig {
        icon: Some(icon.to_string()),
        tap_action: Some(Action::source(source)),
        ..ElementConfig::named(ElementType::Button, name)
    }
}

/// A direction sub-config: tap sends the key, hold repeats it.
fn direction_child(key: &str, icon: Option<&str>) -> Box<ElementConfig> {
    Box::new(ElementConfig {
        icon: icon.map(str::to_string),
        tap_action: Some(Action::key(key)),
        hold_action: Some(Action::repeat()),
        ..ElementConfig::default()
    })
}

/// Navigation key names for one platform, used to build its pad elements
/// and drag template.
struct NavKeys {
    center: &'static str,
    up: &'static str,
    down: &'static str,
    left: &'static str,
    right: &'static str,
}

impl NavKeys {
    /// Drag template inferring a direction key from the dominant per-frame
    /// delta axis.
    fn drag_template(&self) -> String {
        format!(
            "{{{{ (\"{right}\" if deltaX > 0 else \"{left}\") \
             if (deltaX | abs) > (deltaY | abs) \
             else (\"{down}\" if deltaY > 0 else \"{up}\") }}}}",
            up = self.up,
            down = self.down,
            left = self.left,
            right = self.right,
        )
    }

    /// The three pad elements every platform ships: a circlepad, a
    /// touchpad with tap-per-direction, and a dragpad firing rate-limited
    /// drag actions.
    fn pads(&self) -> Vec<ElementConfig> {
        let circlepad = ElementConfig {
            tap_action: Some(Action::key(self.center)),
            up: Some(direction_child(self.up, Some("mdi:chevron-up"))),
            down: Some(direction_child(self.down, Some("mdi:chevron-down"))),
            left: Some(direction_child(self.left, Some("mdi:chevron-left"))),
            right: Some(direction_child(self.right, Some("mdi:chevron-right"))),
            ..ElementConfig::named(ElementType::Circlepad, "circlepad")
        };

        let touchpad = ElementConfig {
            tap_action: Some(Action::key(self.center)),
            up: Some(direction_child(self.up, None)),
            down: Some(direction_child(self.down, None)),
            left: Some(direction_child(self.left, None)),
            right: Some(direction_child(self.right, None)),
            ..ElementConfig::named(ElementType::Touchpad, "touchpad")
        };

        let drag_key = Action {
            key: Some(self.drag_template()),
            repeat_delay: Some(100),
            ..Action::new(ActionKind::Key)
        };
        let multi_drag_key = Action {
            repeat_delay: Some(50),
            ..drag_key.clone()
        };
        let dragpad = ElementConfig {
            icon: Some("mdi:drag-variant".to_string()),
            tap_action: Some(Action::key(self.center)),
            drag_action: Some(drag_key),
            multi_drag_action: Some(multi_drag_key),
            up: Some(Box::default()),
            down: Some(Box::default()),
            left: Some(Box::default()),
            right: Some(Box::default()),
            ..ElementConfig::named(ElementType::Touchpad, "dragpad")
        };

        vec![circlepad, touchpad, dragpad]
    }
}

/// Shared button set over a platform's key vocabulary.
#[allow(clippy::too_many_arguments)]
fn standard_buttons(
    nav: &NavKeys,
    back: &str,
    home: &str,
    power: &str,
    volume_up: &str,
    volume_down: &str,
    volume_mute: &str,
    play_pause: &str,
) -> Vec<ElementConfig> {
    vec![
        repeat_key_button("up", nav.up, "mdi:chevron-up"),
        repeat_key_button("down", nav.down, "mdi:chevron-down"),
        repeat_key_button("left", nav.left, "mdi:chevron-left"),
        repeat_key_button("right", nav.right, "mdi:chevron-right"),
        key_button("center", nav.center, "mdi:circle"),
        key_button("back", back, "mdi:keyboard-backspace"),
        key_button("home", home, "mdi:home"),
        key_button("power", power, "mdi:power"),
        repeat_key_button("volume_up", volume_up, "mdi:volume-high"),
        repeat_key_button("volume_down", volume_down, "mdi:volume-medium"),
        key_button("volume_mute", volume_mute, "mdi:volume-mute"),
        key_button("play_pause", play_pause, "mdi:play-pause"),
    ]
}

/// Default keys for a platform: pads first, then buttons.
pub(super) fn default_keys(platform: Platform) -> Vec<ElementConfig> {
    let (nav, buttons) = match platform {
        Platform::AndroidTv => {
            let nav = NavKeys {
                center: "DPAD_CENTER",
                up: "DPAD_UP",
                down: "DPAD_DOWN",
                left: "DPAD_LEFT",
                right: "DPAD_RIGHT",
            };
            let buttons = standard_buttons(
                &nav,
                "BACK",
                "HOME",
                "POWER",
                "VOLUME_UP",
                "VOLUME_DOWN",
                "MUTE",
                "MEDIA_PLAY_PAUSE",
            );
            (nav, buttons)
        }
        Platform::AppleTv => {
            let nav = NavKeys {
                center: "select",
                up: "up",
                down: "down",
                left: "left",
                right: "right",
            };
            let mut buttons = standard_buttons(
                &nav,
                "menu",
                "home",
                "wakeup",
                "volume_up",
                "volume_down",
                "mute",
                "play_pause",
            );
            buttons.push(key_button("menu", "menu", "mdi:menu"));
            (nav, buttons)
        }
        Platform::FireTv => {
            let nav = NavKeys {
                center: "CENTER",
                up: "UP",
                down: "DOWN",
                left: "LEFT",
                right: "RIGHT",
            };
            let buttons = standard_buttons(
                &nav, "BACK", "HOME", "SLEEP", "VOLUME_UP", "VOLUME_DOWN", "MUTE", "PLAY_PAUSE",
            );
            (nav, buttons)
        }
        Platform::SonyBravia => {
            let nav = NavKeys {
                center: "Confirm",
                up: "Up",
                down: "Down",
                left: "Left",
                right: "Right",
            };
            let buttons = standard_buttons(
                &nav,
                "Return",
                "Home",
                "TvPower",
                "VolumeUp",
                "VolumeDown",
                "Mute",
                "Pause",
            );
            (nav, buttons)
        }
        Platform::Roku => {
            let nav = NavKeys {
                center: "select",
                up: "up",
                down: "down",
                left: "left",
                right: "right",
            };
            let buttons = standard_buttons(
                &nav,
                "back",
                "home",
                "power",
                "volume_up",
                "volume_down",
                "volume_mute",
                "play",
            );
            (nav, buttons)
        }
        Platform::LgWebos => {
            let nav = NavKeys {
                center: "ENTER",
                up: "UP",
                down: "DOWN",
                left: "LEFT",
                right: "RIGHT",
            };
            let buttons = standard_buttons(
                &nav, "BACK", "HOME", "POWER", "VOLUMEUP", "VOLUMEDOWN", "MUTE", "PLAY",
            );
            (nav, buttons)
        }
        Platform::Kodi => {
            let nav = NavKeys {
                center: "Input.Select",
                up: "Input.Up",
                down: "Input.Down",
                left: "Input.Left",
                right: "Input.Right",
            };
            let buttons = standard_buttons(
                &nav,
                "Input.Back",
                "Input.Home",
                "System.Shutdown",
                "Application.VolumeUp",
                "Application.VolumeDown",
                "Application.Mute",
                "Player.PlayPause",
            );
            (nav, buttons)
        }
        Platform::SamsungTv => {
            let nav = NavKeys {
                center: "KEY_ENTER",
                up: "KEY_UP",
                down: "KEY_DOWN",
                left: "KEY_LEFT",
                right: "KEY_RIGHT",
            };
            let buttons = standard_buttons(
                &nav,
                "KEY_RETURN",
                "KEY_HOME",
                "KEY_POWER",
                "KEY_VOLUP",
                "KEY_VOLDOWN",
                "KEY_MUTE",
                "KEY_PLAY_BACK",
            );
            (nav, buttons)
        }
        Platform::PhilipsTv => {
            let nav = NavKeys {
                center: "Confirm",
                up: "CursorUp",
                down: "CursorDown",
                left: "CursorLeft",
                right: "CursorRight",
            };
            let buttons = standard_buttons(
                &nav,
                "Back",
                "Home",
                "Standby",
                "VolumeUp",
                "VolumeDown",
                "Mute",
                "PlayPause",
            );
            (nav, buttons)
        }
        Platform::Jellyfin => {
            let nav = NavKeys {
                center: "Select",
                up: "MoveUp",
                down: "MoveDown",
                left: "MoveLeft",
                right: "MoveRight",
            };
            let buttons = standard_buttons(
                &nav,
                "Back",
                "GoHome",
                "Standby",
                "VolumeUp",
                "VolumeDown",
                "ToggleMute",
                "PlayPause",
            );
            (nav, buttons)
        }
        Platform::UnifiedRemote => {
            let nav = NavKeys {
                center: "enter",
                up: "up",
                down: "down",
                left: "left",
                right: "right",
            };
            let buttons = standard_buttons(
                &nav,
                "back",
                "home",
                "power",
                "volume_up",
                "volume_down",
                "volume_mute",
                "play_pause",
            );
            (nav, buttons)
        }
        Platform::GenericRemote => {
            // Generic key names; the catalog builder unions in every other
            // platform's button names on top of these.
            let nav = NavKeys {
                center: "center",
                up: "up",
                down: "down",
                left: "left",
                right: "right",
            };
            (nav, Vec::new())
        }
    };

    let mut keys = nav.pads();
    keys.extend(buttons);
    keys
}

/// Default sources for a platform. Platforms whose `source` dialect is a
/// no-op get an empty table.
pub(super) fn default_sources(platform: Platform) -> Vec<ElementConfig> {
    match platform {
        Platform::AndroidTv => vec![
            source_button("netflix", "https://www.netflix.com/title", "mdi:netflix"),
            source_button("youtube", "vnd.youtube://", "mdi:youtube"),
            source_button("spotify", "spotify://", "mdi:spotify"),
            source_button("plex", "plex://", "mdi:plex"),
        ],
        Platform::AppleTv => vec![
            source_button("netflix", "Netflix", "mdi:netflix"),
            source_button("youtube", "YouTube", "mdi:youtube"),
            source_button("plex", "Plex", "mdi:plex"),
        ],
        Platform::FireTv => vec![
            source_button("netflix", "com.netflix.ninja", "mdi:netflix"),
            source_button(
                "youtube",
                "com.amazon.firetv.youtube",
                "mdi:youtube",
            ),
        ],
        Platform::SonyBravia => vec![
            source_button("netflix", "Netflix", "mdi:netflix"),
            source_button("youtube", "YouTube", "mdi:youtube"),
        ],
        Platform::Roku => vec![
            source_button("netflix", "Netflix", "mdi:netflix"),
            source_button("youtube", "YouTube", "mdi:youtube"),
            source_button("spotify", "Spotify", "mdi:spotify"),
        ],
        Platform::LgWebos => vec![
            source_button("netflix", "netflix", "mdi:netflix"),
            source_button("youtube", "youtube.leanback.v4", "mdi:youtube"),
            source_button("spotify", "spotify-beehive", "mdi:spotify"),
        ],
        Platform::SamsungTv => vec![
            source_button("netflix", "Netflix", "mdi:netflix"),
            source_button("youtube", "YouTube", "mdi:youtube"),
        ],
        // source dialect is a no-op for these platforms.
        Platform::Kodi
        | Platform::PhilipsTv
        | Platform::Jellyfin
        | Platform::UnifiedRemote
        | Platform::GenericRemote => Vec::new(),
    }
}
