//! Runtime types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use redactlab_core::{
    config::{DEFAULT_EXTRACTOR_TIMEOUT_SECS, DEFAULT_MAX_DIFF_CELLS, DEFAULT_MAX_TEXT_CHARS},
    Entity, RedactLabConfig, RedactionMode, RedactionOutcome,
};
use redactlab_eval::{Alignment, ProcessingStats};

/// Limits and defaults applied by the orchestrator.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Inputs longer than this (in characters) are rejected.
    pub max_text_chars: usize,
    /// Token alignments with more table cells than this are rejected.
    pub max_diff_cells: usize,
    pub extractor_timeout: Duration,
    pub high_accuracy: bool,
    pub default_mode: RedactionMode,
}

impl PipelineSettings {
    pub fn from_config(config: &RedactLabConfig) -> Self {
        Self {
            max_text_chars: config.max_text_chars,
            max_diff_cells: config.max_diff_cells,
            extractor_timeout: Duration::from_secs(config.extractor_timeout_secs),
            high_accuracy: config.high_accuracy,
            default_mode: config.default_mode,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            max_diff_cells: DEFAULT_MAX_DIFF_CELLS,
            extractor_timeout: Duration::from_secs(DEFAULT_EXTRACTOR_TIMEOUT_SECS),
            high_accuracy: false,
            default_mode: RedactionMode::Mask,
        }
    }
}

/// A full pipeline request.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineRequest {
    pub text: String,
    /// Ground-truth redaction to score against.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub mode: Option<RedactionMode>,
    #[serde(default, rename = "highAccuracy")]
    pub high_accuracy: Option<bool>,
}

impl PipelineRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reference: None,
            mode: None,
            high_accuracy: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_mode(mut self, mode: RedactionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_high_accuracy(mut self, high_accuracy: bool) -> Self {
        self.high_accuracy = Some(high_accuracy);
        self
    }
}

/// What happened to the semantic extractor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorStatus {
    /// Extractor unavailable; pattern-only result.
    Skipped,
    /// Extractor answered (possibly with no entities).
    Completed,
    /// Extractor exceeded the timeout; treated as no entities.
    TimedOut,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub id: String,
    #[serde(rename = "processedAt")]
    pub processed_at: String,
    pub mode: RedactionMode,
    /// Pattern-only redaction produced before the extractor ran.
    pub interim: RedactionOutcome,
    #[serde(rename = "redactedText")]
    pub redacted_text: String,
    /// Resolved entities of the final redaction, by start offset.
    pub entities: Vec<Entity>,
    #[serde(rename = "patternEntityCount")]
    pub pattern_entity_count: usize,
    #[serde(rename = "extractedEntityCount")]
    pub extracted_entity_count: usize,
    #[serde(rename = "extractorName")]
    pub extractor_name: String,
    #[serde(rename = "extractorStatus")]
    pub extractor_status: ExtractorStatus,
    pub stats: ProcessingStats,
    /// Token alignment of the redacted text against the reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Alignment>,
}
