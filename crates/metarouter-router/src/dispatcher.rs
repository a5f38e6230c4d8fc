//! Response dispatcher — runs one prompt against the backend for its intent.
//!
//! - image: builds the image-service URL and asks the renderer to show it,
//!   falling back to a plain link.
//! - code / text: streams a single-turn chat completion from the model in
//!   the backend table, re-rendering the growing buffer after every delta.

use std::sync::Arc;

use futures_util::StreamExt;
use thiserror::Error;
use tracing::{debug, info, warn};

use metarouter_core::config::schema::{Config, ConfigError};
use metarouter_core::session::Transcript;
use metarouter_core::types::{ChatMessage, Message, Role, RoutingIntent};
use metarouter_providers::{
    BackendSelection, BackendTable, ChatProvider, ChatRequestConfig, ImageService, ProviderError,
};

use crate::render::{Renderer, CURSOR};

/// Assistant content recorded for an image turn.
pub const IMAGE_ACK: &str = "Imagen generada.";

/// A dispatch that could not produce an assistant message.
///
/// Nothing is retried. Whatever was already rendered stays on screen.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The backend rejected or never answered the request.
    #[error(transparent)]
    Request(#[from] ProviderError),

    /// The stream broke after `partial` had been rendered.
    #[error("response interrupted after {} chars: {source}", .partial.chars().count())]
    Interrupted {
        partial: String,
        #[source]
        source: ProviderError,
    },
}

/// Executes prompts against the selected backend.
pub struct Dispatcher {
    provider: Arc<dyn ChatProvider>,
    table: BackendTable,
    images: ImageService,
    system_prompt: String,
    request_config: ChatRequestConfig,
}

impl Dispatcher {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        table: BackendTable,
        images: ImageService,
        system_prompt: impl Into<String>,
        request_config: ChatRequestConfig,
    ) -> Self {
        Self {
            provider,
            table,
            images,
            system_prompt: system_prompt.into(),
            request_config,
        }
    }

    /// Build a dispatcher from the loaded configuration.
    pub fn from_config(provider: Arc<dyn ChatProvider>, config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            provider,
            BackendTable::from_config(&config.router)?,
            ImageService::new(&config.image),
            config.router.system_prompt.clone(),
            ChatRequestConfig {
                max_tokens: config.router.max_tokens,
            },
        ))
    }

    /// Backend that would handle `intent`.
    pub fn select(&self, intent: RoutingIntent) -> BackendSelection {
        self.table.select(intent)
    }

    /// URL the image path would produce for `prompt`.
    pub fn image_url(&self, prompt: &str) -> String {
        self.images.url_for(prompt)
    }

    /// Produce the assistant message for `prompt`.
    ///
    /// `history` is for display only; it is never sent to the backend.
    pub async fn dispatch(
        &self,
        prompt: &str,
        intent: RoutingIntent,
        history: &Transcript,
        renderer: &mut dyn Renderer,
    ) -> Result<Message, DispatchError> {
        info!(
            intent = %intent,
            prompt_chars = prompt.chars().count(),
            history = history.len(),
            "dispatching prompt"
        );

        renderer.begin(Role::Assistant);

        match self.table.select(intent) {
            BackendSelection::Image { service, icon } => {
                Ok(self.generate_image(prompt, service, icon, renderer))
            }
            BackendSelection::Chat { model, icon } => {
                self.stream_reply(prompt, &model, icon, renderer).await
            }
        }
    }

    fn generate_image(
        &self,
        prompt: &str,
        service: &str,
        icon: &str,
        renderer: &mut dyn Renderer,
    ) -> Message {
        renderer.caption(&format!("{icon} Generando imagen con {service}..."));

        let url = self.images.url_for(prompt);
        debug!(url = %url, "image url built");

        if let Err(e) = renderer.image(&url, &format!("Prompt: {prompt}")) {
            warn!(error = %e, "falling back to image link");
            renderer.markdown("### 🖼️ Tu Imagen");
            renderer.markdown(&format!("[Ver imagen]({url})"));
        }

        Message::assistant(IMAGE_ACK)
    }

    async fn stream_reply(
        &self,
        prompt: &str,
        model: &str,
        icon: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<Message, DispatchError> {
        renderer.caption(&format!("{icon} {model}"));

        let messages = [
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(prompt),
        ];

        let mut stream = self
            .provider
            .stream_chat(&messages, model, &self.request_config)
            .await?;

        let mut buffer = String::new();
        let mut chunks = 0usize;
        while let Some(item) = stream.next().await {
            match item {
                Ok(delta) => {
                    buffer.push_str(&delta);
                    chunks += 1;
                    renderer.frame(&format!("{buffer}{CURSOR}"));
                }
                Err(source) => {
                    warn!(model = %model, chunks, error = %source, "stream interrupted");
                    renderer.finish(&buffer);
                    return Err(DispatchError::Interrupted {
                        partial: buffer,
                        source,
                    });
                }
            }
        }

        renderer.finish(&buffer);
        debug!(
            provider = self.provider.display_name(),
            model = %model,
            chunks,
            chars = buffer.chars().count(),
            "stream complete"
        );

        Ok(Message::assistant(buffer))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Ending, Event, RecordingRenderer, ScriptedProvider};

    fn dispatcher(provider: Arc<ScriptedProvider>) -> Dispatcher {
        Dispatcher::from_config(provider, &Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_text_uses_text_model_and_single_turn_request() {
        let provider = Arc::new(ScriptedProvider::new(&["Hola", "!"], Ending::Done));
        let d = dispatcher(provider.clone());

        let mut history = Transcript::new();
        history.append(Message::user("earlier"));
        history.append(Message::assistant("earlier reply"));

        let mut renderer = RecordingRenderer::default();
        let reply = d
            .dispatch("hola", RoutingIntent::Text, &history, &mut renderer)
            .await
            .unwrap();

        assert_eq!(reply, Message::assistant("Hola!"));

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "openai/gpt-4o");
        assert_eq!(calls[0].max_tokens, 800);
        assert_eq!(
            calls[0].messages,
            vec![
                ChatMessage::system("You are a helpful assistant."),
                ChatMessage::user("hola"),
            ]
        );
    }

    #[tokio::test]
    async fn test_code_uses_code_model() {
        let provider = Arc::new(ScriptedProvider::new(&["fn main() {}"], Ending::Done));
        let d = dispatcher(provider.clone());
        let mut renderer = RecordingRenderer::default();

        d.dispatch("python bug", RoutingIntent::Code, &Transcript::new(), &mut renderer)
            .await
            .unwrap();

        assert_eq!(provider.calls()[0].model, "anthropic/claude-3.5-sonnet");
        assert!(renderer
            .events
            .contains(&Event::Caption("💻 anthropic/claude-3.5-sonnet".into())));
    }

    #[tokio::test]
    async fn test_frames_carry_cursor_and_finish_does_not() {
        let provider = Arc::new(ScriptedProvider::new(&["Uno", " dos", " tres"], Ending::Done));
        let d = dispatcher(provider);
        let mut renderer = RecordingRenderer::default();

        let reply = d
            .dispatch("cuenta", RoutingIntent::Text, &Transcript::new(), &mut renderer)
            .await
            .unwrap();

        assert_eq!(
            renderer.frames(),
            vec!["Uno▌", "Uno dos▌", "Uno dos tres▌"]
        );
        assert_eq!(renderer.events.last(), Some(&Event::Finish("Uno dos tres".into())));
        assert_eq!(reply.content(), "Uno dos tres");
    }

    #[tokio::test]
    async fn test_final_content_is_concatenation_of_chunks() {
        let chunks = ["a", "ñ", "", "🦀", " z"];
        let provider = Arc::new(ScriptedProvider::new(&chunks, Ending::Done));
        let d = dispatcher(provider);
        let mut renderer = RecordingRenderer::default();

        let reply = d
            .dispatch("x", RoutingIntent::Text, &Transcript::new(), &mut renderer)
            .await
            .unwrap();

        assert_eq!(reply.content(), chunks.concat());
        let last_frame = renderer.frames().pop().unwrap();
        assert_eq!(last_frame.trim_end_matches(CURSOR), reply.content());
    }

    #[tokio::test]
    async fn test_request_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::new(&[], Ending::RefuseRequest));
        let d = dispatcher(provider);
        let mut renderer = RecordingRenderer::default();

        let err = d
            .dispatch("hola", RoutingIntent::Text, &Transcript::new(), &mut renderer)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Request(_)));
        assert!(renderer.frames().is_empty());
    }

    #[tokio::test]
    async fn test_mid_stream_failure_keeps_partial() {
        let provider = Arc::new(ScriptedProvider::new(
            &["Empiezo", " y"],
            Ending::BreakMidStream("upstream died".into()),
        ));
        let d = dispatcher(provider);
        let mut renderer = RecordingRenderer::default();

        let err = d
            .dispatch("hola", RoutingIntent::Text, &Transcript::new(), &mut renderer)
            .await
            .unwrap_err();

        match err {
            DispatchError::Interrupted { partial, .. } => assert_eq!(partial, "Empiezo y"),
            other => panic!("expected interrupted, got {other:?}"),
        }
        assert_eq!(renderer.events.last(), Some(&Event::Finish("Empiezo y".into())));
    }

    #[tokio::test]
    async fn test_image_shows_image_and_acknowledges() {
        let provider = Arc::new(ScriptedProvider::new(&[], Ending::Done));
        let d = dispatcher(provider.clone());
        let mut renderer = RecordingRenderer::default();

        let reply = d
            .dispatch("dibuja un dragon", RoutingIntent::Image, &Transcript::new(), &mut renderer)
            .await
            .unwrap();

        assert_eq!(reply, Message::assistant(IMAGE_ACK));
        assert!(provider.calls().is_empty());
        assert_eq!(
            renderer.events,
            vec![
                Event::Begin(Role::Assistant),
                Event::Caption("🎨 Generando imagen con Pollinations AI...".into()),
                Event::Image(
                    "https://image.pollinations.ai/prompt/dibuja%20un%20dragon?width=1024&height=1024&nologo=true&seed=random".into(),
                    "Prompt: dibuja un dragon".into()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_image_falls_back_to_link() {
        let provider = Arc::new(ScriptedProvider::new(&[], Ending::Done));
        let d = dispatcher(provider);
        let mut renderer = RecordingRenderer::refusing_images();

        let reply = d
            .dispatch("foto de un gato", RoutingIntent::Image, &Transcript::new(), &mut renderer)
            .await
            .unwrap();

        assert_eq!(reply.content(), IMAGE_ACK);
        let url = d.image_url("foto de un gato");
        assert!(renderer.events.contains(&Event::Markdown("### 🖼️ Tu Imagen".into())));
        assert!(renderer
            .events
            .contains(&Event::Markdown(format!("[Ver imagen]({url})"))));
    }

    #[test]
    fn test_from_config_rejects_same_models() {
        let mut config = Config::default();
        config.router.code_model = config.router.text_model.clone();
        let provider = Arc::new(ScriptedProvider::new(&[], Ending::Done));
        assert!(Dispatcher::from_config(provider, &config).is_err());
    }

    #[test]
    fn test_select_exposes_table() {
        let d = dispatcher(Arc::new(ScriptedProvider::new(&[], Ending::Done)));
        assert_eq!(d.select(RoutingIntent::Text).label(), "openai/gpt-4o");
        assert_ne!(
            d.select(RoutingIntent::Text),
            d.select(RoutingIntent::Code)
        );
    }
}
