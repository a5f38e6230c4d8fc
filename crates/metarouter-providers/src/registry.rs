//! Provider registry — the chat gateway spec and the backend selection table.
//!
//! [`GatewaySpec`] describes how to reach an OpenAI-compatible gateway.
//! [`BackendTable`] is the static intent → (model, icon) lookup the
//! dispatcher consults for every prompt.

use metarouter_core::config::schema::{ConfigError, RouterConfig};
use metarouter_core::types::RoutingIntent;

// ─────────────────────────────────────────────
// GatewaySpec — static metadata for one gateway
// ─────────────────────────────────────────────

/// Static specification describing a chat gateway.
#[derive(Clone, Debug)]
pub struct GatewaySpec {
    /// Environment variable that conventionally holds the API key.
    pub env_key: &'static str,
    /// Human-readable name for logs.
    pub display_name: &'static str,
    /// Default API base URL.
    pub default_api_base: &'static str,
    /// Headers sent with every request (attribution headers for OpenRouter).
    pub extra_headers: &'static [(&'static str, &'static str)],
}

/// OpenRouter — one key, many upstream models.
pub static OPENROUTER: GatewaySpec = GatewaySpec {
    env_key: "OPENROUTER_API_KEY",
    display_name: "OpenRouter",
    default_api_base: "https://openrouter.ai/api/v1",
    extra_headers: &[("X-Title", "Meta-IA Router")],
};

// ─────────────────────────────────────────────
// Backend selection
// ─────────────────────────────────────────────

/// Icon shown next to the text-tier model.
pub const TEXT_ICON: &str = "⚡";
/// Icon shown next to the code-tier model.
pub const CODE_ICON: &str = "💻";
/// Icon shown while generating an image.
pub const IMAGE_ICON: &str = "🎨";
/// Name of the image-generation service.
pub const IMAGE_SERVICE: &str = "Pollinations AI";

/// Where a prompt of a given intent is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendSelection {
    /// Streaming chat completion with this model.
    Chat { model: String, icon: &'static str },
    /// Image generation service.
    Image {
        service: &'static str,
        icon: &'static str,
    },
}

impl BackendSelection {
    pub fn icon(&self) -> &'static str {
        match self {
            BackendSelection::Chat { icon, .. } | BackendSelection::Image { icon, .. } => icon,
        }
    }

    /// Model identifier or service name, as shown to the user.
    pub fn label(&self) -> &str {
        match self {
            BackendSelection::Chat { model, .. } => model,
            BackendSelection::Image { service, .. } => service,
        }
    }
}

/// Intent → backend lookup table.
///
/// Text and code always map to different models; construction fails otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendTable {
    text_model: String,
    code_model: String,
}

impl BackendTable {
    pub fn new(
        text_model: impl Into<String>,
        code_model: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let text_model = text_model.into();
        let code_model = code_model.into();
        if text_model.trim().is_empty() {
            return Err(ConfigError::EmptyModel { field: "textModel" });
        }
        if code_model.trim().is_empty() {
            return Err(ConfigError::EmptyModel { field: "codeModel" });
        }
        if text_model == code_model {
            return Err(ConfigError::SameModel(text_model));
        }
        Ok(Self {
            text_model,
            code_model,
        })
    }

    pub fn from_config(router: &RouterConfig) -> Result<Self, ConfigError> {
        Self::new(router.text_model.clone(), router.code_model.clone())
    }

    /// Backend for an intent.
    pub fn select(&self, intent: RoutingIntent) -> BackendSelection {
        match intent {
            RoutingIntent::Text => BackendSelection::Chat {
                model: self.text_model.clone(),
                icon: TEXT_ICON,
            },
            RoutingIntent::Code => BackendSelection::Chat {
                model: self.code_model.clone(),
                icon: CODE_ICON,
            },
            RoutingIntent::Image => BackendSelection::Image {
                service: IMAGE_SERVICE,
                icon: IMAGE_ICON,
            },
        }
    }
}

impl Default for BackendTable {
    fn default() -> Self {
        let router = RouterConfig::default();
        Self {
            text_model: router.text_model,
            code_model: router.code_model,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
