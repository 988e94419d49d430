//! # tibera-core
//!
//! Foundation crate for the Tibera event pipeline.
//! Defines the event record, errors, config, and defaults.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod event;

// Re-export the most commonly used types at the crate root.
pub use config::TiberaConfig;
pub use errors::{TiberaError, TiberaResult};
pub use event::{Attributes, EmitOptions, Event, PrivacyLevel};
