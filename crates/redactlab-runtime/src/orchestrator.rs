//! Orchestrator: detect → extract → merge → redact → score.

use tracing::{debug, info, warn};
use uuid::Uuid;

use redactlab_core::{Entity, Error, RedactionMode, RedactionOutcome, Result};
use redactlab_eval::{align_tokens, tokenize, Alignment, ProcessingStats};
use redactlab_extract::{types::to_entities, EntityExtractor};
use redactlab_redact::{apply_redaction, detect_pattern_entities, merge};

use crate::types::*;

/// Top-level orchestrator for redaction runs.
pub struct Orchestrator {
    settings: PipelineSettings,
}

impl Orchestrator {
    pub fn new(settings: PipelineSettings) -> Self {
        info!(
            "Orchestrator initialized: max_text_chars={}, extractor_timeout={:?}",
            settings.max_text_chars, settings.extractor_timeout
        );
        Self { settings }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Reject inputs too long for the quadratic edit-distance pass.
    fn check_len(&self, text: &str) -> Result<()> {
        let len = text.chars().count();
        if len > self.settings.max_text_chars {
            return Err(Error::InputTooLarge {
                len,
                max: self.settings.max_text_chars,
            });
        }
        Ok(())
    }

    /// Reject alignments whose LCS table would exceed the cell budget.
    fn check_alignment(&self, actual: &str, expected: &str) -> Result<()> {
        let cells = (tokenize(actual).len() + 1).saturating_mul(tokenize(expected).len() + 1);
        if cells > self.settings.max_diff_cells {
            return Err(Error::AlignmentTooLarge {
                cells,
                max: self.settings.max_diff_cells,
            });
        }
        Ok(())
    }

    /// Pattern-only redaction. Works without any extractor.
    pub fn quick_pass(&self, text: &str, mode: RedactionMode) -> Result<RedactionOutcome> {
        self.check_len(text)?;
        Ok(apply_redaction(text, &detect_pattern_entities(text), mode))
    }

    /// Redact `text` with caller-supplied entities.
    pub fn redact_with(
        &self,
        text: &str,
        entities: &[Entity],
        mode: RedactionMode,
    ) -> Result<RedactionOutcome> {
        self.check_len(text)?;
        Ok(apply_redaction(text, entities, mode))
    }

    /// Score a redaction against its original and an optional reference.
    pub async fn evaluate(
        &self,
        original: &str,
        redacted: &str,
        entity_count: usize,
        reference: Option<&str>,
    ) -> Result<ProcessingStats> {
        self.check_len(original)?;
        self.check_len(redacted)?;
        if let Some(reference) = reference {
            self.check_len(reference)?;
        }
        let (original, redacted) = (original.to_string(), redacted.to_string());
        let reference = reference.map(str::to_string);
        run_blocking(move || {
            ProcessingStats::compute(&original, &redacted, entity_count, reference.as_deref())
        })
        .await
    }

    /// Token alignment of two texts.
    pub async fn compare(&self, actual: &str, expected: &str) -> Result<Alignment> {
        self.check_len(actual)?;
        self.check_len(expected)?;
        self.check_alignment(actual, expected)?;
        let (actual, expected) = (actual.to_string(), expected.to_string());
        run_blocking(move || align_tokens(&actual, &expected)).await
    }

    /// Full pipeline run.
    pub async fn run(
        &self,
        extractor: &dyn EntityExtractor,
        request: PipelineRequest,
    ) -> Result<PipelineReport> {
        self.check_len(&request.text)?;
        if let Some(reference) = &request.reference {
            self.check_len(reference)?;
        }

        let text = request.text.as_str();
        let mode = request.mode.unwrap_or(self.settings.default_mode);
        let high_accuracy = request.high_accuracy.unwrap_or(self.settings.high_accuracy);

        // Fast path
        let pattern_entities = detect_pattern_entities(text);
        let interim = apply_redaction(text, &pattern_entities, mode);
        debug!(
            "Interim redaction: {} pattern entities, {} resolved",
            pattern_entities.len(),
            interim.entities.len()
        );

        // Semantic pass
        let (extracted, extractor_status) = self.extract(extractor, text, high_accuracy).await;

        let pattern_entity_count = pattern_entities.len();
        let extracted_entity_count = extracted.len();
        let merged = merge(extracted, pattern_entities);
        let outcome = apply_redaction(text, &merged, mode);

        if let Some(reference) = &request.reference {
            self.check_alignment(&outcome.redacted_text, reference)?;
        }
        let (stats, diff) = {
            let original = request.text.clone();
            let redacted = outcome.redacted_text.clone();
            let reference = request.reference.clone();
            let entity_count = outcome.entities.len();
            run_blocking(move || {
                let stats = ProcessingStats::compute(
                    &original,
                    &redacted,
                    entity_count,
                    reference.as_deref(),
                );
                let diff = reference.as_deref().map(|r| align_tokens(&redacted, r));
                (stats, diff)
            })
            .await?
        };

        info!(
            "Redaction complete: {} entities ({} pattern, {} extracted, extractor {:?}), similarity {:.1}%",
            outcome.entities.len(),
            pattern_entity_count,
            extracted_entity_count,
            extractor_status,
            stats.similarity_score
        );

        Ok(PipelineReport {
            id: Uuid::new_v4().to_string(),
            processed_at: chrono::Utc::now().to_rfc3339(),
            mode,
            interim,
            redacted_text: outcome.redacted_text,
            entities: outcome.entities,
            pattern_entity_count,
            extracted_entity_count,
            extractor_name: extractor.name().to_string(),
            extractor_status,
            stats,
            diff,
        })
    }

    /// Call the extractor under the configured timeout. Unavailability and
    /// timeouts both mean zero extra entities.
    async fn extract(
        &self,
        extractor: &dyn EntityExtractor,
        text: &str,
        high_accuracy: bool,
    ) -> (Vec<Entity>, ExtractorStatus) {
        if !extractor.is_available() {
            debug!("Extractor {} unavailable, pattern-only run", extractor.name());
            return (Vec::new(), ExtractorStatus::Skipped);
        }

        match tokio::time::timeout(
            self.settings.extractor_timeout,
            extractor.extract(text, high_accuracy),
        )
        .await
        {
            Ok(extracted) => (to_entities(extracted), ExtractorStatus::Completed),
            Err(_) => {
                warn!(
                    "Extractor {} timed out after {:?}",
                    extractor.name(),
                    self.settings.extractor_timeout
                );
                (Vec::new(), ExtractorStatus::TimedOut)
            }
        }
    }
}

/// Run CPU-heavy scoring off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("Scoring task failed: {}", e)))
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(PipelineSettings::default())
    }
}
