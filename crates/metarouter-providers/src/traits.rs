//! Chat provider trait — the seam between the dispatcher and any backend.
//!
//! `HttpProvider` in `http_provider.rs` covers every OpenAI-compatible API.
//! Tests plug in scripted providers through the same trait.

use async_trait::async_trait;
use metarouter_core::types::ChatMessage;

use crate::error::ProviderError;
use crate::stream::DeltaStream;

/// Configuration passed to each chat call.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl Default for ChatRequestConfig {
    fn default() -> Self {
        Self { max_tokens: 800 }
    }
}

/// A backend that answers chat prompts as a stream of text deltas.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Start a streaming chat completion.
    ///
    /// # Arguments
    /// * `messages` — Request messages in OpenAI format.
    /// * `model`    — Backend model identifier (e.g. `"openai/gpt-4o"`).
    /// * `config`   — Token cap.
    ///
    /// # Returns
    /// A finite, non-restartable stream of content deltas. Errors before the
    /// first byte (transport, non-2xx) are returned directly; errors after
    /// that arrive as an `Err` item and end the stream.
    async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        config: &ChatRequestConfig,
    ) -> Result<DeltaStream, ProviderError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
