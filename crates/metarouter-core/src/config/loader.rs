//! Config loader — reads `~/.metarouter/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.metarouter/config.json` (or an explicit path)
//! 3. Environment variables `METAROUTER_<SECTION>__<FIELD>` (override JSON)
//! 4. `OPENROUTER_API_KEY` when no key was set by 2 or 3

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given path (or the default one) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    let config = load_config_from_path(&config_path);
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// `lookup` resolves a variable name to its value.
///
/// Supported overrides:
/// - `METAROUTER_ROUTER__TEXT_MODEL` → `router.text_model`
/// - `METAROUTER_ROUTER__CODE_MODEL` → `router.code_model`
/// - `METAROUTER_ROUTER__MAX_TOKENS` → `router.max_tokens`
/// - `METAROUTER_ROUTER__SYSTEM_PROMPT` → `router.system_prompt`
/// - `METAROUTER_PROVIDERS__OPENROUTER__API_KEY` → `providers.openrouter.api_key`
/// - `METAROUTER_PROVIDERS__OPENROUTER__API_BASE` → `providers.openrouter.api_base`
/// - `OPENROUTER_API_KEY` → `providers.openrouter.api_key` (only if still empty)
/// - `METAROUTER_IMAGE__OPEN_IN_BROWSER` → `image.open_in_browser`
/// - `METAROUTER_TRANSCRIPTION__API_KEY` → `transcription.api_key`
/// - `METAROUTER_TRANSCRIPTION__LANGUAGE` → `transcription.language`
fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    // Router
    if let Some(val) = lookup("METAROUTER_ROUTER__TEXT_MODEL") {
        config.router.text_model = val;
    }
    if let Some(val) = lookup("METAROUTER_ROUTER__CODE_MODEL") {
        config.router.code_model = val;
    }
    if let Some(val) = lookup("METAROUTER_ROUTER__MAX_TOKENS") {
        match val.parse::<u32>() {
            Ok(n) => config.router.max_tokens = n,
            Err(_) => warn!("Ignoring invalid METAROUTER_ROUTER__MAX_TOKENS: {}", val),
        }
    }
    if let Some(val) = lookup("METAROUTER_ROUTER__SYSTEM_PROMPT") {
        config.router.system_prompt = val;
    }

    // OpenRouter credential
    if let Some(val) = lookup("METAROUTER_PROVIDERS__OPENROUTER__API_KEY") {
        config.providers.openrouter.api_key = val;
    }
    if let Some(val) = lookup("METAROUTER_PROVIDERS__OPENROUTER__API_BASE") {
        config.providers.openrouter.api_base = Some(val);
    }
    if !config.providers.openrouter.is_configured() {
        if let Some(val) = lookup("OPENROUTER_API_KEY") {
            debug!("Using OPENROUTER_API_KEY from environment");
            config.providers.openrouter.api_key = val;
        }
    }

    // Image
    if let Some(val) = lookup("METAROUTER_IMAGE__OPEN_IN_BROWSER") {
        config.image.open_in_browser = val == "true" || val == "1";
    }

    // Transcription
    if let Some(val) = lookup("METAROUTER_TRANSCRIPTION__API_KEY") {
        config.transcription.api_key = val;
    }
    if let Some(val) = lookup("METAROUTER_TRANSCRIPTION__LANGUAGE") {
        config.transcription.language = val;
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
