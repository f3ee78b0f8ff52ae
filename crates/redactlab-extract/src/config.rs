//! Extractor configuration persistence and provider selection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{ExtractorConfigResponse, ExtractorConfigUpdate, LLMProvider, ResolvedProvider};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_ACCURATE_MODEL: &str = "gpt-4o";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_ANTHROPIC_ACCURATE_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_GROQ_ACCURATE_MODEL: &str = "llama-3.3-70b-versatile";

/// Stored extractor configuration (persisted to extractor-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_openai_accurate_model")]
    pub openai_accurate_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_anthropic_accurate_model")]
    pub anthropic_accurate_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_groq_accurate_model")]
    pub groq_accurate_model: String,
    /// Path to config file for saving.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_openai_accurate_model() -> String {
    DEFAULT_OPENAI_ACCURATE_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_anthropic_accurate_model() -> String {
    DEFAULT_ANTHROPIC_ACCURATE_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}
fn default_groq_accurate_model() -> String {
    DEFAULT_GROQ_ACCURATE_MODEL.into()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: default_openai_model(),
            openai_accurate_model: default_openai_accurate_model(),
            anthropic_model: default_anthropic_model(),
            anthropic_accurate_model: default_anthropic_accurate_model(),
            groq_model: default_groq_model(),
            groq_accurate_model: default_groq_accurate_model(),
            config_path: PathBuf::new(),
        }
    }
}

impl ExtractorConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Load config from file, taking missing API keys from `lookup`.
    pub fn load_with<F>(config_path: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: ExtractorConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();

        if config.openai_api_key.is_none() {
            config.openai_api_key = lookup("OPENAI_API_KEY");
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = lookup("ANTHROPIC_API_KEY");
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = lookup("GROQ_API_KEY");
        }

        config
    }

    /// Save config to disk.
    pub fn save(&self) -> redactlab_core::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved extractor config to {}", self.config_path.display());
        Ok(())
    }

    /// Apply an update, merging with existing config.
    pub fn apply_update(&mut self, update: &ExtractorConfigUpdate) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        fn set_key(target: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value {
                // An empty key clears the stored one.
                *target = if v.is_empty() { None } else { Some(v.clone()) };
            }
        }

        set(&mut self.preferred_provider, &update.preferred_provider);
        set_key(&mut self.openai_api_key, &update.openai_api_key);
        set_key(&mut self.anthropic_api_key, &update.anthropic_api_key);
        set_key(&mut self.groq_api_key, &update.groq_api_key);
        set(&mut self.openai_model, &update.openai_model);
        set(&mut self.openai_accurate_model, &update.openai_accurate_model);
        set(&mut self.anthropic_model, &update.anthropic_model);
        set(&mut self.anthropic_accurate_model, &update.anthropic_accurate_model);
        set(&mut self.groq_model, &update.groq_model);
        set(&mut self.groq_accurate_model, &update.groq_accurate_model);
    }

    fn provider_entry(&self, provider: LLMProvider, high_accuracy: bool) -> Option<ResolvedProvider> {
        let (key, fast, accurate) = match provider {
            LLMProvider::OpenAI => (&self.openai_api_key, &self.openai_model, &self.openai_accurate_model),
            LLMProvider::Anthropic => (
                &self.anthropic_api_key,
                &self.anthropic_model,
                &self.anthropic_accurate_model,
            ),
            LLMProvider::Groq => (&self.groq_api_key, &self.groq_model, &self.groq_accurate_model),
        };
        key.as_ref().map(|k| ResolvedProvider {
            provider,
            model: if high_accuracy { accurate.clone() } else { fast.clone() },
            api_key: k.clone(),
        })
    }

    /// Resolve which provider and model to use.
    pub fn resolve_provider(&self, high_accuracy: bool) -> Option<ResolvedProvider> {
        // Explicit preference
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "openai" => self.provider_entry(LLMProvider::OpenAI, high_accuracy),
                "anthropic" => self.provider_entry(LLMProvider::Anthropic, high_accuracy),
                "groq" => self.provider_entry(LLMProvider::Groq, high_accuracy),
                _ => None,
            };
        }

        // Auto mode: Anthropic > Groq > OpenAI
        [LLMProvider::Anthropic, LLMProvider::Groq, LLMProvider::OpenAI]
            .into_iter()
            .find_map(|p| self.provider_entry(p, high_accuracy))
    }

    /// Build the public config response (no API keys exposed).
    pub fn to_response(&self) -> ExtractorConfigResponse {
        let fast = self.resolve_provider(false);
        let accurate = self.resolve_provider(true);
        ExtractorConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            openai_configured: self.openai_api_key.is_some(),
            anthropic_configured: self.anthropic_api_key.is_some(),
            groq_configured: self.groq_api_key.is_some(),
            active_provider: fast.as_ref().map(|r| r.provider.to_string()),
            active_model: fast.map(|r| r.model),
            active_accurate_model: accurate.map(|r| r.model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extractor-config.json");
        let config = ExtractorConfig::load_with(&path, no_env);
        assert_eq!(config.preferred_provider, "auto");
        assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
        assert!(config.resolve_provider(false).is_none());
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn test_env_keys_fill_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExtractorConfig::load_with(&dir.path().join("c.json"), |k| {
            (k == "GROQ_API_KEY").then(|| "gsk-test".to_string())
        });
        let resolved = config.resolve_provider(false).unwrap();
        assert_eq!(resolved.provider, LLMProvider::Groq);
        assert_eq!(resolved.model, DEFAULT_GROQ_MODEL);
        assert_eq!(resolved.api_key, "gsk-test");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("extractor-config.json");
        let mut config = ExtractorConfig::load_with(&path, no_env);
        config.apply_update(&ExtractorConfigUpdate {
            preferred_provider: Some("openai".into()),
            openai_api_key: Some("sk-test".into()),
            openai_accurate_model: Some("gpt-4.1".into()),
            ..Default::default()
        });
        config.save().unwrap();

        let reloaded = ExtractorConfig::load_with(&path, no_env);
        assert_eq!(reloaded.preferred_provider, "openai");
        assert_eq!(reloaded.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(reloaded.resolve_provider(true).unwrap().model, "gpt-4.1");
        assert_eq!(reloaded.resolve_provider(false).unwrap().model, DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn test_auto_mode_precedence() {
        let mut config = ExtractorConfig {
            openai_api_key: Some("o".into()),
            groq_api_key: Some("g".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve_provider(false).unwrap().provider, LLMProvider::Groq);

        config.anthropic_api_key = Some("a".into());
        let resolved = config.resolve_provider(true).unwrap();
        assert_eq!(resolved.provider, LLMProvider::Anthropic);
        assert_eq!(resolved.model, DEFAULT_ANTHROPIC_ACCURATE_MODEL);
    }

    #[test]
    fn test_explicit_preference_without_key() {
        let config = ExtractorConfig {
            preferred_provider: "openai".into(),
            anthropic_api_key: Some("a".into()),
            ..Default::default()
        };
        assert!(config.resolve_provider(false).is_none());
    }

    #[test]
    fn test_empty_key_clears() {
        let mut config = ExtractorConfig {
            groq_api_key: Some("g".into()),
            ..Default::default()
        };
        config.apply_update(&ExtractorConfigUpdate {
            groq_api_key: Some(String::new()),
            ..Default::default()
        });
        assert!(config.groq_api_key.is_none());
    }

    #[test]
    fn test_response_hides_keys() {
        let config = ExtractorConfig {
            anthropic_api_key: Some("secret".into()),
            ..Default::default()
        };
        let response = config.to_response();
        assert!(response.anthropic_configured);
        assert_eq!(response.active_provider.as_deref(), Some("anthropic"));
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("secret"));
    }
}
