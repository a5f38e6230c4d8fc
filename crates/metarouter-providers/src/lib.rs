//! Provider layer for Meta-IA Router.
//!
//! # Architecture
//!
//! - [`traits::ChatProvider`] — trait for streaming chat-completion backends
//! - [`http_provider::HttpProvider`] — OpenAI-compatible client (OpenRouter by default)
//! - [`stream`] — SSE decoding into a lazy stream of text deltas
//! - [`registry`] — gateway spec and the intent → backend selection table
//! - [`image`] — image-service URL builder
//! - [`transcription`] — speech-to-text via Whisper-compatible APIs

pub mod error;
pub mod http_provider;
pub mod image;
pub mod registry;
pub mod stream;
pub mod traits;
pub mod transcription;

// Re-export main types for convenience
pub use error::ProviderError;
pub use http_provider::{create_provider, HttpProvider};
pub use image::ImageService;
pub use registry::{BackendSelection, BackendTable, GatewaySpec, OPENROUTER};
pub use stream::DeltaStream;
pub use traits::{ChatProvider, ChatRequestConfig};
pub use transcription::{TranscriptionError, TranscriptionProvider, WhisperTranscriber};
