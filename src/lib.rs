//! Remote Card Core
//!
//! This library is the engine behind a configurable remote-control card for
//! smart-home dashboards: it resolves declarative element configurations
//! against card and platform defaults, classifies raw pointer/key input
//! into gestures, dispatches the resulting actions to an abstract backend,
//! and derives the values elements display.

// Module declarations
pub mod backend;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod gesture;
pub mod models;
pub mod resolver;
pub mod template;
pub mod value;

#[cfg(test)]
mod testing;
