//! Backend entity state snapshots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A read-only snapshot of one backend entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EntityState {
    /// Literal entity state string (e.g. `"playing"`, `"locked"`).
    pub state: String,
    /// Free-form entity attributes.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    /// A new snapshot with the given state and no attributes.
    #[must_use]
    pub fn new(state: &str) -> Self {
        Self {
            state: state.to_string(),
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute insertion, used heavily in tests.
    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: Value) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    /// Attribute lookup by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// The domain prefix of an entity id (`"lock"` for `"lock.front_door"`).
///
/// Returns the whole id when it has no `.` separator.
#[must_use]
pub fn entity_domain(entity_id: &str) -> &str {
    entity_id.split('.').next().unwrap_or(entity_id)
}
