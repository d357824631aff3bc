//! LLM provider catalogue and completion calls.
//!
//! Single source of truth for supported providers, their API key
//! environment variables, base URLs, and default models.  Gemini speaks its
//! own `generateContent` wire shape; every other provider is treated as
//! OpenAI-compatible.

use crate::config::Config;
use crate::retry::{self, RetryPolicy};
use anyhow::{Context, Result, bail};
use serde_json::{Value, json};

/// A provider definition with its key source and default model.
pub struct ProviderDef {
    pub id: &'static str,
    pub display: &'static str,
    /// Environment variable holding the API key.  `None` means the provider
    /// does not require authentication (e.g. Ollama).
    pub api_key_env: Option<&'static str>,
    pub base_url: Option<&'static str>,
    pub default_model: Option<&'static str>,
}

pub const PROVIDERS: &[ProviderDef] = &[
    ProviderDef {
        id: "google",
        display: "Google (Gemini)",
        api_key_env: Some("GEMINI_API_KEY"),
        base_url: Some("https://generativelanguage.googleapis.com/v1beta"),
        default_model: Some("gemini-2.5-flash"),
    },
    ProviderDef {
        id: "openai",
        display: "OpenAI (GPT)",
        api_key_env: Some("OPENAI_API_KEY"),
        base_url: Some("https://api.openai.com/v1"),
        default_model: Some("gpt-4.1-mini"),
    },
    ProviderDef {
        id: "ollama",
        display: "Ollama (local)",
        api_key_env: None,
        base_url: Some("http://localhost:11434/v1"),
        default_model: Some("llama3.1"),
    },
    ProviderDef {
        id: "custom",
        display: "Custom / OpenAI-compatible endpoint",
        api_key_env: Some("TESTFORGE_API_KEY"),
        base_url: None, // set base_url in config.toml
        default_model: None,
    },
];

/// Look up a provider by ID.
pub fn provider_by_id(id: &str) -> Option<&'static ProviderDef> {
    PROVIDERS.iter().find(|p| p.id == id)
}

/// One resolved, ready-to-send completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub provider: String,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f64,
    pub prompt: String,
}

impl CompletionRequest {
    /// Resolve provider, base URL, model, and API key against the config
    /// and the process environment.
    pub fn resolve(config: &Config, temperature: f64, prompt: String) -> Result<Self> {
        let def = provider_by_id(&config.provider).with_context(|| {
            format!(
                "Unknown provider '{}' (run `testforge providers` for the list)",
                config.provider
            )
        })?;

        let base_url = config
            .base_url
            .clone()
            .or_else(|| def.base_url.map(str::to_string))
            .with_context(|| {
                format!(
                    "No base URL for provider {}; set base_url in config.toml",
                    def.id
                )
            })?;

        let model = config
            .model
            .clone()
            .or_else(|| def.default_model.map(str::to_string))
            .with_context(|| {
                format!(
                    "No model for provider {}; set model in config.toml or pass --model",
                    def.id
                )
            })?;

        let api_key = match def.api_key_env {
            Some(var) => Some(std::env::var(var).map_err(|_| {
                anyhow::anyhow!("{} not set — {} requires an API key", var, def.display)
            })?),
            None => None,
        };

        Ok(Self {
            provider: def.id.to_string(),
            base_url,
            model,
            api_key,
            temperature,
            prompt,
        })
    }
}

/// Call the configured provider and return the completion text.
pub async fn complete(http: &reqwest::Client, req: &CompletionRequest) -> Result<String> {
    match req.provider.as_str() {
        "google" => complete_gemini(http, req).await,
        _ => complete_openai_compatible(http, req).await,
    }
}

async fn complete_gemini(http: &reqwest::Client, req: &CompletionRequest) -> Result<String> {
    let key = req
        .api_key
        .as_deref()
        .context("Gemini requires an API key")?;
    let url = format!(
        "{}/models/{}:generateContent?key={}",
        req.base_url.trim_end_matches('/'),
        req.model,
        key,
    );

    let body = json!({
        "contents": [{ "parts": [{ "text": req.prompt }] }],
        "generationConfig": { "temperature": req.temperature },
    });

    let resp =
        retry::send_with_retry(http.post(&url).json(&body), &RetryPolicy::default(), "gemini")
            .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        bail!("Provider returned {} — {}", status, text);
    }

    let data: Value = resp.json().await.context("Invalid JSON from provider")?;
    gemini_text(&data).context("Gemini response carried no text")
}

async fn complete_openai_compatible(
    http: &reqwest::Client,
    req: &CompletionRequest,
) -> Result<String> {
    let url = format!("{}/chat/completions", req.base_url.trim_end_matches('/'));

    let body = json!({
        "model": req.model,
        "messages": [{ "role": "user", "content": req.prompt }],
        "temperature": req.temperature,
    });

    let mut builder = http.post(&url).json(&body);
    if let Some(ref key) = req.api_key {
        builder = builder.bearer_auth(key);
    }

    let resp = retry::send_with_retry(builder, &RetryPolicy::default(), "chat").await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        bail!("Provider returned {} — {}", status, text);
    }

    let data: Value = resp.json().await.context("Invalid JSON from provider")?;
    openai_text(&data).context("Provider response carried no message content")
}

/// Extract the completion text from a Gemini `generateContent` response.
/// Multi-part candidates concatenate in order.
pub fn gemini_text(data: &Value) -> Option<String> {
    let parts = data
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Extract the message text from an OpenAI-style chat completion response.
pub fn openai_text(data: &Value) -> Option<String> {
    let content = data
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?;
    if content.trim().is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}
