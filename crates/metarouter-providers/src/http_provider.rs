//! Streaming HTTP provider for OpenAI-compatible chat APIs.
//!
//! Talks to `<api_base>/chat/completions` with `stream: true` and hands the
//! SSE body to [`crate::stream::sse_delta_stream`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use tracing::{debug, error, warn};

use metarouter_core::config::schema::ProviderConfig;
use metarouter_core::types::{ChatCompletionRequest, ChatMessage};

use crate::error::ProviderError;
use crate::registry::{GatewaySpec, OPENROUTER};
use crate::stream::{sse_delta_stream, DeltaStream};
use crate::traits::{ChatProvider, ChatRequestConfig};

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// A chat provider that streams from any OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://openrouter.ai/api/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Headers sent with each request.
    extra_headers: HeaderMap,
    spec: &'static GatewaySpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// Create a new HttpProvider from a provider config and gateway spec.
    ///
    /// # Arguments
    /// * `config`  — User's config (api_key, api_base)
    /// * `spec`    — Static gateway spec from the registry
    pub fn new(config: &ProviderConfig, spec: &'static GatewaySpec) -> Result<Self, ProviderError> {
        // Resolve API base: config > spec default
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| spec.default_api_base.to_string());

        let mut extra_headers = HeaderMap::new();
        for (key, value) in spec.extra_headers {
            if let (Ok(name), Ok(val)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                extra_headers.insert(name, val);
            } else {
                warn!("Invalid header: {}={}", key, value);
            }
        }

        // Only connecting is bounded; streams run until the backend closes them.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(ProviderError::Client)?;

        Ok(HttpProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            extra_headers,
            spec,
        })
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl ChatProvider for HttpProvider {
    async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        config: &ChatRequestConfig,
    ) -> Result<DeltaStream, ProviderError> {
        debug!(
            provider = self.spec.display_name,
            model = %model,
            messages = messages.len(),
            max_tokens = config.max_tokens,
            "Calling LLM (stream)"
        );

        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            stream: true,
            max_tokens: Some(config.max_tokens),
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "text/event-stream")
            .headers(self.extra_headers.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.spec.display_name, error = %e, "HTTP request failed");
                ProviderError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = self.spec.display_name,
                status = %status,
                body = %body,
                "API error"
            );
            return Err(ProviderError::Api { status, body });
        }

        Ok(sse_delta_stream(response.bytes_stream()))
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Builder (convenience)
// ─────────────────────────────────────────────

/// Build the OpenRouter provider from its config section.
///
/// Fails if no API key has been resolved.
pub fn create_provider(config: &ProviderConfig) -> Result<HttpProvider, ProviderError> {
    if !config.is_configured() {
        return Err(ProviderError::MissingKey {
            env_key: OPENROUTER.env_key,
        });
    }

    debug!(
        provider = OPENROUTER.display_name,
        api_base = config.api_base.as_deref().unwrap_or("default"),
        "Creating chat provider"
    );

    HttpProvider::new(config, &OPENROUTER)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
