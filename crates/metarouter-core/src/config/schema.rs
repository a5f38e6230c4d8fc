//! Configuration schema.
//!
//! Hierarchy: `Config` → `RouterConfig`, `ProvidersConfig`, `ImageConfig`,
//! `TranscriptionConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a loaded configuration cannot be used.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("router.{field} must not be empty")]
    EmptyModel { field: &'static str },

    #[error("text and code intents must use different models (both are '{0}')")]
    SameModel(String),

    #[error("router.maxTokens must be greater than zero")]
    ZeroMaxTokens,
}

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.metarouter/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub router: RouterConfig,
    pub providers: ProvidersConfig,
    pub image: ImageConfig,
    pub transcription: TranscriptionConfig,
}

impl Config {
    /// Check the invariants the router depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let router = &self.router;
        if router.text_model.trim().is_empty() {
            return Err(ConfigError::EmptyModel { field: "textModel" });
        }
        if router.code_model.trim().is_empty() {
            return Err(ConfigError::EmptyModel { field: "codeModel" });
        }
        if router.text_model == router.code_model {
            return Err(ConfigError::SameModel(router.text_model.clone()));
        }
        if router.max_tokens == 0 {
            return Err(ConfigError::ZeroMaxTokens);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────

/// Backend models and request shape for chat intents.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterConfig {
    /// Model used for general conversation.
    pub text_model: String,
    /// Model used when the prompt is about programming.
    pub code_model: String,
    /// Cap on generated tokens per call.
    pub max_tokens: u32,
    /// System preamble sent before the user prompt.
    pub system_prompt: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            text_model: "openai/gpt-4o".to_string(),
            code_model: "anthropic/claude-3.5-sonnet".to_string(),
            max_tokens: 800,
            system_prompt: "You are a helpful assistant.".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Connection settings for an OpenAI-compatible chat gateway.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for bearer authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides the gateway default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// All provider configurations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openrouter: ProviderConfig,
}

// ─────────────────────────────────────────────
// Image generation
// ─────────────────────────────────────────────

/// Parameters of the image-generation endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageConfig {
    /// Base endpoint; the encoded prompt is appended as a path segment.
    pub endpoint: String,
    pub width: u32,
    pub height: u32,
    pub nologo: bool,
    /// Seed query value. `"random"` asks the service to pick one.
    pub seed: String,
    /// Try to open generated images in the system viewer.
    pub open_in_browser: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://image.pollinations.ai/prompt".to_string(),
            width: 1024,
            height: 1024,
            nologo: true,
            seed: "random".to_string(),
            open_in_browser: true,
        }
    }
}

// ─────────────────────────────────────────────
// Transcription
// ─────────────────────────────────────────────

/// Speech-to-text settings for voice input.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptionConfig {
    /// API key; falls back to `GROQ_API_KEY` when empty.
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    /// ISO-639-1 language hint.
    pub language: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://api.groq.com/openai/v1/audio/transcriptions".to_string(),
            model: "whisper-large-v3".to_string(),
            language: "es".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
