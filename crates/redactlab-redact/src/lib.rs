//! Redaction engine: pattern-based entity detection, merging, and
//! redaction with position tracking.
//!
//! Everything here is synchronous and side-effect free. Semantic entities
//! from an external extractor are just another input to [`merge`].

pub mod apply;
pub mod merge;
pub mod patterns;

pub use apply::apply_redaction;
pub use merge::merge;
pub use patterns::{detect_pattern_entities, PatternDetector};
