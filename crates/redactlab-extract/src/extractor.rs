//! Entity extractor trait and implementations.
//!
//! The `EntityExtractor` trait abstracts over semantic entity recognition.
//! Implementations:
//! - `LlmExtractor`: prompts an external LLM for PERSON/LOCATION and other entities
//! - `NoopExtractor`: always returns nothing (pattern-only mode)

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use redactlab_core::EntityCategory;

use crate::config::ExtractorConfig;
use crate::providers;
use crate::types::ExtractedEntity;

/// Completion budget for one extraction answer.
const MAX_COMPLETION_TOKENS: usize = 2048;

/// Trait for semantic entity extractors.
///
/// Implementations never fail: any internal error is logged and reported
/// as an empty result.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    /// Extract entities from `text`. `high_accuracy` trades latency for recall.
    async fn extract(&self, text: &str, high_accuracy: bool) -> Vec<ExtractedEntity>;

    /// Check if the extractor can currently be used.
    fn is_available(&self) -> bool;

    /// Short name used in logs and reports.
    fn name(&self) -> &str;
}

/// Extractor that always returns nothing.
#[derive(Debug, Default)]
pub struct NoopExtractor;

#[async_trait]
impl EntityExtractor for NoopExtractor {
    async fn extract(&self, _text: &str, _high_accuracy: bool) -> Vec<ExtractedEntity> {
        Vec::new()
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "noop"
    }
}

/// Extractor backed by an external LLM API.
pub struct LlmExtractor {
    client: Client,
    config: Arc<RwLock<ExtractorConfig>>,
}

impl LlmExtractor {
    pub fn new(config: Arc<RwLock<ExtractorConfig>>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl EntityExtractor for LlmExtractor {
    async fn extract(&self, text: &str, high_accuracy: bool) -> Vec<ExtractedEntity> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Read the config before awaiting; the guard must not cross the await.
        let resolved = self.config.read().resolve_provider(high_accuracy);
        let Some(resolved) = resolved else {
            debug!("No extractor provider configured");
            return Vec::new();
        };

        let system = system_prompt(high_accuracy);
        match providers::complete(&self.client, &resolved, &system, text, MAX_COMPLETION_TOKENS).await {
            Ok(raw) => {
                let entities = parse_entities(&raw);
                info!(
                    "Extracted {} entities via {} ({})",
                    entities.len(),
                    resolved.provider,
                    resolved.model
                );
                entities
            }
            Err(e) => {
                warn!("Entity extraction via {} failed: {}", resolved.provider, e);
                Vec::new()
            }
        }
    }

    fn is_available(&self) -> bool {
        self.config.read().resolve_provider(false).is_some()
    }

    fn name(&self) -> &str {
        "llm"
    }
}

fn system_prompt(high_accuracy: bool) -> String {
    let categories: Vec<&str> = EntityCategory::all().iter().map(|c| c.label()).collect();
    let mut prompt = format!(
        "You find sensitive information in user-supplied text. \
         Report every person name and location, plus any {} you see. \
         Respond with JSON only: an array of objects with keys \"text\" and \"category\". \
         \"text\" must be copied exactly as it appears in the input. \
         \"category\" must be one of: {}. \
         Respond with [] if nothing is found.",
        categories[2..].join(", ").to_lowercase().replace('_', " "),
        categories.join(", ")
    );
    if high_accuracy {
        prompt.push_str(
            " Be exhaustive: include partial names, nicknames, and every repeated mention.",
        );
    }
    prompt
}

/// Parse extractor output into entities.
///
/// Accepts a JSON array, an object with an `entities` array, or either of
/// those wrapped in a Markdown code fence or surrounding prose. Anything
/// else yields an empty list.
pub fn parse_entities(raw: &str) -> Vec<ExtractedEntity> {
    let body = strip_code_fence(raw.trim());

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return entities_from_value(value);
    }

    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (body.find(open), body.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str::<Value>(&body[start..=end]) {
                    return entities_from_value(value);
                }
            }
        }
    }

    debug!("Extractor output was not valid JSON");
    Vec::new()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn entities_from_value(value: Value) -> Vec<ExtractedEntity> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("entities") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<ExtractedEntity>(item).ok())
        .filter(|e| !e.text.trim().is_empty())
        .collect()
}
