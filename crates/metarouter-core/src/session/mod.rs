//! Session context — the explicit owner of a conversation transcript.
//!
//! A [`Session`] is created when a chat starts and consumed by
//! [`Session::end`] when it stops. Nothing is written to disk: when the
//! session ends, its transcript is dropped with it.

pub mod transcript;

pub use transcript::Transcript;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::types::Message;

/// State for one active chat session.
#[derive(Debug)]
pub struct Session {
    key: String,
    started_at: DateTime<Utc>,
    transcript: Transcript,
}

/// What is left of a session after it ends.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub key: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub messages: usize,
}

impl Session {
    /// Start a new, empty session.
    pub fn start(key: impl Into<String>) -> Self {
        let key = key.into();
        debug!(session = %key, "session started");
        Session {
            key,
            started_at: Utc::now(),
            transcript: Transcript::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append a message to this session's transcript.
    pub fn record(&mut self, message: Message) {
        self.transcript.append(message);
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// End the session, discarding its transcript.
    pub fn end(self) -> SessionSummary {
        let summary = SessionSummary {
            key: self.key,
            started_at: self.started_at,
            ended_at: Utc::now(),
            messages: self.transcript.len(),
        };
        debug!(
            session = %summary.key,
            messages = summary.messages,
            "session ended"
        );
        summary
    }
}
