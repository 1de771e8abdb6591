//! The abstract backend command interface.
//!
//! All mutation of the smart-home platform goes through this trait; the
//! engine itself never retries failed calls and never mutates entity state
//! directly. Hosts implement it over their transport of choice.

#![allow(async_fn_in_trait)]

use anyhow::Result;
use serde_json::Value;

use crate::models::{EntityState, Target};

/// Host-provided access to the home-automation backend.
pub trait Backend {
    /// Perform a `domain.service` backend call with free-form data and an
    /// optional target block. At-least-once semantics; the engine does not
    /// retry.
    async fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: Value,
        target: Option<Target>,
    ) -> Result<()>;

    /// Read-only snapshot of an entity, if known.
    fn entity_state(&self, entity_id: &str) -> Option<EntityState>;

    /// Localized string lookup; `None` falls back to engine defaults.
    fn localize(&self, key: &str) -> Option<String>;

    /// The id of the current user, for confirmation exemptions.
    fn current_user(&self) -> Option<String>;

    /// Fetch a host-served file as text (custom actions catalogs).
    async fn fetch_file(&self, path: &str) -> Result<String>;
}
