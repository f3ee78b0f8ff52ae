//! External LLM provider calls.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic uses the
//! Messages API. Extraction needs the whole answer, so requests are
//! non-streaming.

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use redactlab_core::{Error, Result};

use crate::types::{LLMProvider, ResolvedProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Run one completion and return the model's text output.
pub async fn complete(
    client: &Client,
    resolved: &ResolvedProvider,
    system: &str,
    user: &str,
    max_tokens: usize,
) -> Result<String> {
    match resolved.provider {
        LLMProvider::OpenAI => complete_openai_compat(client, OPENAI_URL, resolved, system, user, max_tokens).await,
        LLMProvider::Groq => complete_openai_compat(client, GROQ_URL, resolved, system, user, max_tokens).await,
        LLMProvider::Anthropic => complete_anthropic(client, resolved, system, user, max_tokens).await,
    }
}

/// Complete via OpenAI-compatible APIs (OpenAI, Groq).
async fn complete_openai_compat(
    client: &Client,
    url: &str,
    resolved: &ResolvedProvider,
    system: &str,
    user: &str,
    max_tokens: usize,
) -> Result<String> {
    let body = json!({
        "model": resolved.model,
        "messages": [
            {"role": "system", "content": system},
            {"role": "user", "content": user},
        ],
        "temperature": 0,
        "max_tokens": max_tokens,
        "stream": false,
    });

    debug!("Requesting completion from {} with model {}", url, resolved.model);

    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", resolved.api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let parsed = read_json(response).await?;
    parsed["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Extractor("Completion had no message content".into()))
}

/// Complete via Anthropic's Messages API.
async fn complete_anthropic(
    client: &Client,
    resolved: &ResolvedProvider,
    system: &str,
    user: &str,
    max_tokens: usize,
) -> Result<String> {
    let body = json!({
        "model": resolved.model,
        "system": system,
        "messages": [{"role": "user", "content": user}],
        "temperature": 0,
        "max_tokens": max_tokens,
    });

    debug!("Requesting completion from Anthropic with model {}", resolved.model);

    let response = client
        .post(ANTHROPIC_URL)
        .header("x-api-key", &resolved.api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let parsed = read_json(response).await?;
    let text: String = parsed["content"]
        .as_array()
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b["type"] == "text")
                .filter_map(|b| b["text"].as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::Extractor("Completion had no text content".into()));
    }
    Ok(text)
}

async fn read_json(response: reqwest::Response) -> Result<serde_json::Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Extractor(format!("API error {}: {}", status, body)));
    }
    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| Error::Http(format!("Invalid response body: {}", e)))
}

/// Test an API key by making a minimal request.
pub async fn test_api_key(provider: &str, api_key: &str) -> std::result::Result<(), String> {
    let client = Client::new();

    match provider {
        "openai" | "groq" => {
            let url = if provider == "openai" {
                "https://api.openai.com/v1/models"
            } else {
                "https://api.groq.com/openai/v1/models"
            };
            let resp = client
                .get(url)
                .header("Authorization", format!("Bearer {}", api_key))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if resp.status().is_success() {
                Ok(())
            } else {
                Err(format!("API returned status {}", resp.status()))
            }
        }
        "anthropic" => {
            let resp = client
                .post(ANTHROPIC_URL)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("Content-Type", "application/json")
                .json(&json!({
                    "model": crate::config::DEFAULT_ANTHROPIC_MODEL,
                    "max_tokens": 1,
                    "messages": [{"role": "user", "content": "Hi"}],
                }))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if resp.status().is_success() || resp.status().as_u16() == 400 {
                // 400 with valid key means key works (may be quota/model issue)
                Ok(())
            } else {
                Err(format!("API returned status {}", resp.status()))
            }
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}
