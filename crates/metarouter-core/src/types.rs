//! Core types for Meta-IA Router.
//!
//! Two families live here:
//! - the session data model ([`Role`], [`Message`]) that the transcript stores,
//! - the wire types for OpenAI-compatible streaming chat completions
//!   ([`ChatMessage`], [`ChatCompletionRequest`], [`ChatCompletionChunk`]).

use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────
// Transcript messages
// ─────────────────────────────────────────────

/// Who authored a transcript message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role-tagged message recorded in the session transcript.
///
/// Fields are private so a message cannot change after it is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

// ─────────────────────────────────────────────
// Routing
// ─────────────────────────────────────────────

/// Coarse category chosen for a single prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingIntent {
    Image,
    Code,
    Text,
}

impl RoutingIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingIntent::Image => "image",
            RoutingIntent::Code => "code",
            RoutingIntent::Text => "text",
        }
    }
}

impl fmt::Display for RoutingIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────
// Chat completion request (wire format)
// ─────────────────────────────────────────────

/// A chat message in the OpenAI request format.
///
/// Each variant maps to a `role` field value. Requests are single-turn, so
/// there is no assistant variant.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum ChatMessage {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: String },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage::User {
            content: content.into(),
        }
    }
}

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

// ─────────────────────────────────────────────
// Streaming chunks (wire format)
// ─────────────────────────────────────────────

/// One `data:` payload of a streamed chat completion.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Mid-stream failure reported by the gateway.
    #[serde(default)]
    pub error: Option<ChunkError>,
}

impl ChatCompletionChunk {
    /// Text carried by the first choice, if any and non-empty.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Finish reason of the first choice, if the stream says it is done.
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.finish_reason.as_deref())
    }
}

/// A single choice within a streamed chunk.
#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The incremental payload of a choice.
#[derive(Debug, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object embedded in a stream chunk.
#[derive(Debug, Deserialize)]
pub struct ChunkError {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: String,
}

impl ChunkError {
    /// Message with the gateway's error code appended when present.
    pub fn describe(&self) -> String {
        match &self.code {
            Some(serde_json::Value::Null) | None => self.message.clone(),
            Some(serde_json::Value::String(code)) => format!("{} (code {code})", self.message),
            Some(code) => format!("{} (code {code})", self.message),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
