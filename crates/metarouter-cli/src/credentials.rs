//! OpenRouter credential resolution.
//!
//! The key comes from the config file or environment (already merged by the
//! loader) and, failing that, from an interactive prompt. Without a key the
//! chat command stops before any prompt is routed.

use anyhow::{bail, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use metarouter_core::config::Config;
use metarouter_providers::OPENROUTER;

/// Where the API key in use came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    /// Config file or environment.
    Configured,
    /// Typed in by the user for this run.
    Prompted,
}

/// Make sure `config` carries an OpenRouter key, asking via `prompt` if not.
pub fn ensure_api_key<F>(config: &mut Config, prompt: F) -> Result<CredentialSource>
where
    F: FnOnce() -> Result<Option<String>>,
{
    if config.providers.openrouter.is_configured() {
        info!(provider = OPENROUTER.display_name, "using configured API key");
        return Ok(CredentialSource::Configured);
    }

    let entered = prompt()?
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    match entered {
        Some(key) => {
            info!(provider = OPENROUTER.display_name, "using API key entered at prompt");
            config.providers.openrouter.api_key = key;
            Ok(CredentialSource::Prompted)
        }
        None => bail!(
            "⚠️ Modo Local: Ingresa tu API Key (set {} or providers.openrouter.apiKey)",
            OPENROUTER.env_key
        ),
    }
}

/// Ask for the key on the terminal. Ctrl-C / Ctrl-D count as "no key".
pub fn prompt_api_key() -> Result<Option<String>> {
    println!("{}", "⚙️ Sistema".bold());
    let mut editor = DefaultEditor::new()?;
    match editor.readline("API Key (OpenRouter): ") {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
