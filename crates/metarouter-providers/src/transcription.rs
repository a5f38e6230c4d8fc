//! Voice transcription — speech-to-text via Whisper APIs.
//!
//! Defaults to Groq's Whisper endpoint; any OpenAI-compatible
//! `/audio/transcriptions` endpoint works. Requests carry a language hint
//! (Spanish by default).

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, warn};

use metarouter_core::config::schema::TranscriptionConfig;

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// Why a clip could not be turned into a prompt.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// The service answered but heard nothing usable.
    #[error("speech was not recognized")]
    Unrecognized,

    /// Transport failure, missing key, or non-2xx answer.
    #[error("transcription service unreachable: {0}")]
    Unreachable(String),

    /// The clip could not be read from disk.
    #[error("cannot read audio file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl TranscriptionError {
    /// Message shown to the user, who then falls back to typing.
    pub fn user_message(&self) -> String {
        match self {
            TranscriptionError::Unrecognized => "No te entendí bien, intenta escribir.".to_string(),
            TranscriptionError::Unreachable(_) => "Error conectando con el servicio de voz.".to_string(),
            TranscriptionError::Io { path, .. } => format!("No pude leer el audio: {path}"),
        }
    }
}

impl From<reqwest::Error> for TranscriptionError {
    fn from(e: reqwest::Error) -> Self {
        TranscriptionError::Unreachable(e.to_string())
    }
}

// ─────────────────────────────────────────────
// Trait
// ─────────────────────────────────────────────

/// Trait for speech-to-text transcription providers.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe an audio file to text.
    async fn transcribe(&self, file_path: &Path) -> Result<String, TranscriptionError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

// ─────────────────────────────────────────────
// Whisper
// ─────────────────────────────────────────────

/// Whisper-based transcription over an OpenAI-compatible endpoint.
pub struct WhisperTranscriber {
    api_key: String,
    api_url: String,
    model: String,
    language: String,
    client: reqwest::Client,
}

impl WhisperTranscriber {
    /// Create a transcriber from its config section.
    ///
    /// Falls back to `GROQ_API_KEY` env var if `api_key` is empty.
    pub fn new(config: &TranscriptionConfig) -> Self {
        let key = if config.api_key.is_empty() {
            std::env::var("GROQ_API_KEY").unwrap_or_default()
        } else {
            config.api_key.clone()
        };

        Self {
            api_key: key,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            language: config.language.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Check if the transcriber is configured (has an API key).
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperTranscriber {
    async fn transcribe(&self, file_path: &Path) -> Result<String, TranscriptionError> {
        if !self.is_configured() {
            warn!("transcription: no API key configured");
            return Err(TranscriptionError::Unreachable("no API key configured".into()));
        }

        let file_bytes = tokio::fs::read(file_path)
            .await
            .map_err(|source| TranscriptionError::Io {
                path: file_path.display().to_string(),
                source,
            })?;

        let file_name = file_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        debug!(
            path = %file_path.display(),
            model = %self.model,
            language = %self.language,
            "transcribing audio"
        );

        let file_part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("language", self.language.clone());

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .timeout(Duration::from_secs(60))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                body = %body,
                "transcription API error"
            );
            return Err(TranscriptionError::Unreachable(format!(
                "transcription API returned {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = response.json().await?;
        let text = json["text"].as_str().unwrap_or_default().trim().to_string();

        if text.is_empty() {
            debug!("transcription returned no text");
            return Err(TranscriptionError::Unrecognized);
        }

        debug!(chars = text.len(), "transcription complete");
        Ok(text)
    }

    fn display_name(&self) -> &str {
        "Whisper"
    }
}

// ─────────────────────────────────────────────
// Helper
// ─────────────────────────────────────────────

/// Check if a file path looks like an audio file.
pub fn is_audio_file(path: &str) -> bool {
    let lower = path.to_lowercase();
    [
        ".ogg", ".oga", ".opus", ".mp3", ".m4a", ".wav", ".flac", ".aac", ".webm",
    ]
    .iter()
    .any(|ext| lower.ends_with(ext))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_key: &str, api_url: &str) -> TranscriptionConfig {
        TranscriptionConfig {
            api_key: api_key.into(),
            api_url: api_url.into(),
            ..TranscriptionConfig::default()
        }
    }

    fn temp_clip() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(b"RIFF....WAVEfmt ").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file("voice.ogg"));
        assert!(is_audio_file("song.MP3"));
        assert!(is_audio_file("recording.wav"));
        assert!(!is_audio_file("photo.jpg"));
        assert!(!is_audio_file("video.mp4"));
    }

    #[test]
    fn test_configured_with_key() {
        let t = WhisperTranscriber::new(&config("gsk_test_key_123", "http://localhost"));
        assert!(t.is_configured());
        assert_eq!(t.display_name(), "Whisper");
        assert_eq!(t.language, "es");
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            TranscriptionError::Unrecognized.user_message(),
            "No te entendí bien, intenta escribir."
        );
        assert_eq!(
            TranscriptionError::Unreachable("down".into()).user_message(),
            "Error conectando con el servicio de voz."
        );
    }

    #[tokio::test]
    async fn test_transcribe_file_not_found() {
        let t = WhisperTranscriber::new(&config("test-key", "http://127.0.0.1:1"));
        let result = t.transcribe(Path::new("/nonexistent/audio.ogg")).await;
        assert!(matches!(result, Err(TranscriptionError::Io { .. })));
    }

    #[tokio::test]
    async fn test_transcribe_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(header("Authorization", "Bearer gsk_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": " dibuja un gato "
            })))
            .mount(&mock_server)
            .await;

        let url = format!("{}/audio/transcriptions", mock_server.uri());
        let t = WhisperTranscriber::new(&config("gsk_key", &url));
        let clip = temp_clip();

        let text = t.transcribe(clip.path()).await.unwrap();
        assert_eq!(text, "dibuja un gato");
    }

    #[tokio::test]
    async fn test_transcribe_empty_text_is_unrecognized() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": ""})))
            .mount(&mock_server)
            .await;

        let t = WhisperTranscriber::new(&config("gsk_key", &mock_server.uri()));
        let clip = temp_clip();

        let result = t.transcribe(clip.path()).await;
        assert!(matches!(result, Err(TranscriptionError::Unrecognized)));
    }

    #[tokio::test]
    async fn test_transcribe_api_error_is_unreachable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&mock_server)
            .await;

        let t = WhisperTranscriber::new(&config("gsk_key", &mock_server.uri()));
        let clip = temp_clip();

        match t.transcribe(clip.path()).await {
            Err(TranscriptionError::Unreachable(msg)) => assert!(msg.contains("503")),
            other => panic!("expected unreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transcribe_network_error_is_unreachable() {
        let t = WhisperTranscriber::new(&config("gsk_key", "http://127.0.0.1:1/audio"));
        let clip = temp_clip();
        let result = t.transcribe(clip.path()).await;
        assert!(matches!(result, Err(TranscriptionError::Unreachable(_))));
    }
}
