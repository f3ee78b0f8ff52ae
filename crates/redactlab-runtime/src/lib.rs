//! Runtime orchestrator for the redaction pipeline.
//!
//! Pattern detection gives a fast interim result; the semantic extractor
//! runs under a timeout and its entities are merged in before the final
//! redaction, scoring and reference comparison.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Orchestrator;
pub use types::*;
