//! Test doubles shared by the dispatcher and pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::stream;

use metarouter_core::types::{ChatMessage, Role};
use metarouter_providers::{ChatProvider, ChatRequestConfig, DeltaStream, ProviderError};

use crate::render::{ImageDisplayError, Renderer};

/// How a scripted call ends.
#[derive(Clone, Debug)]
pub enum Ending {
    Done,
    /// Fail before any delta is produced.
    RefuseRequest,
    /// Yield the deltas, then a stream error.
    BreakMidStream(String),
}

/// A recorded call to [`ScriptedProvider::stream_chat`].
#[derive(Clone, Debug)]
pub struct Call {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// Provider that replays fixed deltas and records what it was asked.
pub struct ScriptedProvider {
    deltas: Vec<String>,
    ending: Ending,
    pub calls: Mutex<Vec<Call>>,
}

impl ScriptedProvider {
    pub fn new(deltas: &[&str], ending: Ending) -> Self {
        Self {
            deltas: deltas.iter().map(|d| d.to_string()).collect(),
            ending,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        config: &ChatRequestConfig,
    ) -> Result<DeltaStream, ProviderError> {
        self.calls.lock().unwrap().push(Call {
            model: model.to_string(),
            messages: messages.to_vec(),
            max_tokens: config.max_tokens,
        });

        let mut items: Vec<Result<String, ProviderError>> =
            self.deltas.iter().cloned().map(Ok).collect();
        match &self.ending {
            Ending::Done => {}
            Ending::RefuseRequest => {
                return Err(ProviderError::Stream("request refused".into()));
            }
            Ending::BreakMidStream(msg) => items.push(Err(ProviderError::Stream(msg.clone()))),
        }
        Ok(Box::pin(stream::iter(items)))
    }

    fn display_name(&self) -> &str {
        "Scripted"
    }
}

/// Everything a renderer was asked to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Message(Role, String),
    Begin(Role),
    Caption(String),
    Markdown(String),
    Frame(String),
    Finish(String),
    Image(String, String),
}

/// Renderer that records calls; optionally refuses images.
#[derive(Default)]
pub struct RecordingRenderer {
    pub events: Vec<Event>,
    pub refuse_images: bool,
}

impl RecordingRenderer {
    pub fn refusing_images() -> Self {
        Self {
            events: Vec::new(),
            refuse_images: true,
        }
    }

    pub fn frames(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Frame(f) => Some(f.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn message(&mut self, role: Role, content: &str) {
        self.events.push(Event::Message(role, content.to_string()));
    }

    fn begin(&mut self, role: Role) {
        self.events.push(Event::Begin(role));
    }

    fn caption(&mut self, text: &str) {
        self.events.push(Event::Caption(text.to_string()));
    }

    fn markdown(&mut self, text: &str) {
        self.events.push(Event::Markdown(text.to_string()));
    }

    fn frame(&mut self, partial: &str) {
        self.events.push(Event::Frame(partial.to_string()));
    }

    fn finish(&mut self, content: &str) {
        self.events.push(Event::Finish(content.to_string()));
    }

    fn image(&mut self, url: &str, caption: &str) -> Result<(), ImageDisplayError> {
        if self.refuse_images {
            return Err(ImageDisplayError("no display".into()));
        }
        self.events.push(Event::Image(url.to_string(), caption.to_string()));
        Ok(())
    }
}
