//! Supported backend control platforms.
//!
//! Each platform is a device-control dialect: the same logical `key` or
//! `source` action maps to a different backend call shape per platform.

use serde::{Deserialize, Serialize};

/// A backend device-control dialect.
///
/// Serialized names match the user-facing configuration strings
/// (e.g. `"Android TV"`, `"LG webOS"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Platform {
    /// Android TV remote integration (the default dialect).
    #[default]
    #[serde(rename = "Android TV")]
    AndroidTv,
    /// Apple TV remote integration.
    #[serde(rename = "Apple TV")]
    AppleTv,
    /// Amazon Fire TV (ADB-backed).
    #[serde(rename = "Fire TV")]
    FireTv,
    /// Sony BRAVIA televisions.
    #[serde(rename = "Sony BRAVIA")]
    SonyBravia,
    /// Roku players and televisions.
    #[serde(rename = "Roku")]
    Roku,
    /// LG webOS televisions.
    #[serde(rename = "LG webOS")]
    LgWebos,
    /// Kodi media centers.
    #[serde(rename = "Kodi")]
    Kodi,
    /// Samsung Tizen televisions.
    #[serde(rename = "Samsung TV")]
    SamsungTv,
    /// Philips Android televisions.
    #[serde(rename = "Philips TV")]
    PhilipsTv,
    /// Jellyfin media clients.
    #[serde(rename = "Jellyfin")]
    Jellyfin,
    /// Unified Remote desktop control.
    #[serde(rename = "Unified Remote")]
    UnifiedRemote,
    /// Plain `remote.send_command` passthrough with no platform defaults
    /// beyond the union of all other platforms.
    #[serde(rename = "Generic Remote")]
    GenericRemote,
}

impl Platform {
    /// All supported platforms, in catalog order.
    pub const ALL: [Self; 12] = [
        Self::AndroidTv,
        Self::AppleTv,
        Self::FireTv,
        Self::SonyBravia,
        Self::Roku,
        Self::LgWebos,
        Self::Kodi,
        Self::SamsungTv,
        Self::PhilipsTv,
        Self::Jellyfin,
        Self::UnifiedRemote,
        Self::GenericRemote,
    ];

    /// The user-facing configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AndroidTv => "Android TV",
            Self::AppleTv => "Apple TV",
            Self::FireTv => "Fire TV",
            Self::SonyBravia => "Sony BRAVIA",
            Self::Roku => "Roku",
            Self::LgWebos => "LG webOS",
            Self::Kodi => "Kodi",
            Self::SamsungTv => "Samsung TV",
            Self::PhilipsTv => "Philips TV",
            Self::Jellyfin => "Jellyfin",
            Self::UnifiedRemote => "Unified Remote",
            Self::GenericRemote => "Generic Remote",
        }
    }

    /// Whether the platform supports a virtual keyboard dialog.
    #[must_use]
    pub const fn supports_keyboard(self) -> bool {
        matches!(
            self,
            Self::AndroidTv
                | Self::SonyBravia
                | Self::FireTv
                | Self::Roku
                | Self::LgWebos
                | Self::Kodi
                | Self::UnifiedRemote
                | Self::AppleTv
        )
    }

    /// Whether the platform supports a global search dialog.
    #[must_use]
    pub const fn supports_search(self) -> bool {
        matches!(
            self,
            Self::AndroidTv | Self::SonyBravia | Self::FireTv | Self::Roku | Self::Kodi
        )
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
