//! RedactLab core types: entities, redaction modes, configuration and errors.

pub mod config;
pub mod entity;
pub mod error;

pub use config::{DataPaths, RedactLabConfig};
pub use entity::{Entity, EntityCategory, RedactionMode, RedactionOutcome};
pub use error::{Error, Result};
