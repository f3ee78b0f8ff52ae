//! Scoring and comparison of redacted text.
//!
//! - `distance`: Levenshtein distance and normalized similarity
//! - `stats`: per-run processing statistics
//! - `diff`: LCS token alignment for side-by-side comparison

pub mod diff;
pub mod distance;
pub mod stats;

pub use diff::{align_tokens, tokenize, Alignment, DiffChunk, DiffKind};
pub use distance::{levenshtein_distance, similarity};
pub use stats::ProcessingStats;
