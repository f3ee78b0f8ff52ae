//! Extractor wire types and config API shapes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use redactlab_core::{Entity, EntityCategory};

/// LLM provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    OpenAI,
    Anthropic,
    Groq,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Groq => write!(f, "groq"),
        }
    }
}

/// Provider, model and key selected for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub provider: LLMProvider,
    pub model: String,
    pub api_key: String,
}

/// An entity as returned by the extractor: literal text plus a free-form
/// category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub text: String,
    #[serde(alias = "type", alias = "label")]
    pub category: String,
}

impl ExtractedEntity {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Convert to an unresolved [`Entity`]. Unknown categories and blank
    /// text yield `None`.
    pub fn into_entity(self) -> Option<Entity> {
        if self.text.trim().is_empty() {
            return None;
        }
        match self.category.parse::<EntityCategory>() {
            Ok(category) => Some(Entity::new(self.text, category)),
            Err(e) => {
                debug!("Dropping extracted entity {:?}: {}", self.text, e);
                None
            }
        }
    }
}

/// Convert extractor output into entities, dropping unmappable records.
pub fn to_entities(extracted: Vec<ExtractedEntity>) -> Vec<Entity> {
    extracted
        .into_iter()
        .filter_map(ExtractedEntity::into_entity)
        .collect()
}

/// Partial update to the extractor configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractorConfigUpdate {
    #[serde(rename = "preferredProvider")]
    pub preferred_provider: Option<String>,
    #[serde(rename = "openaiApiKey")]
    pub openai_api_key: Option<String>,
    #[serde(rename = "anthropicApiKey")]
    pub anthropic_api_key: Option<String>,
    #[serde(rename = "groqApiKey")]
    pub groq_api_key: Option<String>,
    #[serde(rename = "openaiModel")]
    pub openai_model: Option<String>,
    #[serde(rename = "openaiAccurateModel")]
    pub openai_accurate_model: Option<String>,
    #[serde(rename = "anthropicModel")]
    pub anthropic_model: Option<String>,
    #[serde(rename = "anthropicAccurateModel")]
    pub anthropic_accurate_model: Option<String>,
    #[serde(rename = "groqModel")]
    pub groq_model: Option<String>,
    #[serde(rename = "groqAccurateModel")]
    pub groq_accurate_model: Option<String>,
}

/// Public view of the extractor configuration (no API keys).
#[derive(Debug, Clone, Serialize)]
pub struct ExtractorConfigResponse {
    #[serde(rename = "preferredProvider")]
    pub preferred_provider: String,
    #[serde(rename = "openaiConfigured")]
    pub openai_configured: bool,
    #[serde(rename = "anthropicConfigured")]
    pub anthropic_configured: bool,
    #[serde(rename = "groqConfigured")]
    pub groq_configured: bool,
    #[serde(rename = "activeProvider")]
    pub active_provider: Option<String>,
    #[serde(rename = "activeModel")]
    pub active_model: Option<String>,
    #[serde(rename = "activeAccurateModel")]
    pub active_accurate_model: Option<String>,
}

/// Request to test an API key.
#[derive(Debug, Clone, Deserialize)]
pub struct TestKeyRequest {
    pub provider: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_entity_maps_categories() {
        let entity = ExtractedEntity::new("Ada Lovelace", "person").into_entity().unwrap();
        assert_eq!(entity.category, EntityCategory::Person);
        assert!(!entity.is_resolved());

        assert!(ExtractedEntity::new("Acme", "ORGANIZATION").into_entity().is_none());
        assert!(ExtractedEntity::new("  ", "PERSON").into_entity().is_none());
    }

    #[test]
    fn test_to_entities_keeps_order() {
        let entities = to_entities(vec![
            ExtractedEntity::new("Paris", "LOCATION"),
            ExtractedEntity::new("Acme", "ORG"),
            ExtractedEntity::new("Bob", "PERSON"),
        ]);
        let texts: Vec<_> = entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Paris", "Bob"]);
    }

    #[test]
    fn test_extracted_entity_accepts_type_alias() {
        let parsed: ExtractedEntity =
            serde_json::from_str(r#"{"text": "Oslo", "type": "LOCATION"}"#).unwrap();
        assert_eq!(parsed.category, "LOCATION");
    }
}
