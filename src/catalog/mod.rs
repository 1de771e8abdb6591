//! Immutable platform default catalog.
//!
//! Maps each supported backend platform to its default key and source
//! element tables. The registry is built once on first access and never
//! mutated afterwards, so concurrent readers need no locking.

mod keys;

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::{Action, ElementConfig, ElementType, Platform};

/// The default key and source tables for one platform.
#[derive(Debug, Clone, Default)]
pub struct PlatformCatalog {
    /// Default key elements (pads first, then buttons).
    pub keys: Vec<ElementConfig>,
    /// Default source-selection elements.
    pub sources: Vec<ElementConfig>,
}

impl PlatformCatalog {
    /// The named default element, keys taking precedence over sources.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ElementConfig> {
        self.keys
            .iter()
            .chain(self.sources.iter())
            .find(|element| element.name.as_deref() == Some(name))
    }
}

static REGISTRY: OnceLock<HashMap<Platform, PlatformCatalog>> = OnceLock::new();

/// The default catalog for `platform`.
#[must_use]
pub fn catalog(platform: Platform) -> &'static PlatformCatalog {
    &REGISTRY.get_or_init(build_registry)[&platform]
}

fn build_registry() -> HashMap<Platform, PlatformCatalog> {
    let mut registry = HashMap::new();
    for platform in Platform::ALL {
        if platform == Platform::GenericRemote {
            continue;
        }
        registry.insert(
            platform,
            PlatformCatalog {
                keys: keys::default_keys(platform),
                sources: keys::default_sources(platform),
            },
        );
    }
    registry.insert(Platform::GenericRemote, build_generic_remote(&registry));
    registry
}

/// The Generic Remote catalog: its own pad elements plus the union of every
/// other platform's button names, each mapped to a plain `key` action whose
/// command is the element's own name.
fn build_generic_remote(others: &HashMap<Platform, PlatformCatalog>) -> PlatformCatalog {
    let mut keys = keys::default_keys(Platform::GenericRemote);
    let mut seen: std::collections::HashSet<String> = keys
        .iter()
        .filter_map(|element| element.name.clone())
        .collect();

    let mut sources = Vec::new();
    for platform in Platform::ALL {
        let Some(catalog) = others.get(&platform) else {
            continue;
        };
        for key in &catalog.keys {
            if key.element_type != ElementType::Button {
                continue;
            }
            if let Some(generic) = generalize(key, &mut seen) {
                keys.push(generic);
            }
        }
        for source in &catalog.sources {
            if let Some(generic) = generalize(source, &mut seen) {
                sources.push(generic);
            }
        }
    }

    PlatformCatalog { keys, sources }
}

/// A generic button firing its own name as the key command, keeping the
/// original icon and hold action.
fn generalize(
    element: &ElementConfig,
    seen: &mut std::collections::HashSet<String>,
) -> Option<ElementConfig> {
    let name = element.name.as_deref()?;
    if !seen.insert(name.to_string()) {
        return None;
    }
    Some(ElementConfig {
        icon: element.icon.clone(),
        tap_action: Some(Action::key(name)),
        hold_action: element.hold_action.clone(),
        ..ElementConfig::named(ElementType::Button, name)
    })
}
