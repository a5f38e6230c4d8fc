//! Errors raised while talking to a chat backend.

use thiserror::Error;

/// Failure of a chat-completion call, before or during streaming.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No API key was resolved for the gateway.
    #[error("no API key configured (set {env_key} or providers.openrouter.apiKey)")]
    MissingKey { env_key: &'static str },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, TLS, or mid-body transport failure.
    #[error("error calling LLM: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response (auth, rate limit, unknown model...).
    #[error("error calling LLM: {status} — {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// A `data:` payload that is not a valid completion chunk.
    #[error("malformed stream chunk: {0}")]
    Decode(#[source] serde_json::Error),

    /// The backend reported an error inside the stream.
    #[error("backend error during stream: {0}")]
    Stream(String),
}
