//! Semantic entity extraction through external LLM APIs.
//!
//! The extractor is the only non-deterministic, networked collaborator of
//! the redaction pipeline. Every failure collapses to "no entities", so the
//! pattern-based path always works on its own.

pub mod config;
pub mod extractor;
pub mod providers;
pub mod types;

pub use config::ExtractorConfig;
pub use extractor::{parse_entities, EntityExtractor, LlmExtractor, NoopExtractor};
pub use types::*;
