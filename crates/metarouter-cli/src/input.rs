//! REPL input parsing and voice capture.

use std::path::{Path, PathBuf};

use colored::Colorize;
use tracing::warn;

use metarouter_providers::transcription::is_audio_file;
use metarouter_providers::TranscriptionProvider;

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "salir", "/exit", "/quit", "/salir", ":q"];

/// One line of REPL input, parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Exit,
    History,
    NewSession,
    Voice(PathBuf),
    /// A slash command used wrong; carries the usage line.
    Usage(&'static str),
    Prompt(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ReplCommand::Empty;
        }

        let lower = trimmed.to_lowercase();
        if EXIT_COMMANDS.contains(&lower.as_str()) {
            return ReplCommand::Exit;
        }

        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };

        match head.to_lowercase().as_str() {
            "/historial" | "/history" => ReplCommand::History,
            "/nueva" | "/new" => ReplCommand::NewSession,
            "/voz" | "/voice" if rest.is_empty() => ReplCommand::Usage("/voz <archivo de audio>"),
            "/voz" | "/voice" => ReplCommand::Voice(helpers::expand_tilde(rest)),
            _ => ReplCommand::Prompt(trimmed.to_string()),
        }
    }
}

/// Transcribe `clip` for use as a prompt, reporting the outcome on screen.
///
/// Returns `None` when nothing usable was heard; the caller falls back to
/// typed input.
pub async fn transcribe_clip(transcriber: &dyn TranscriptionProvider, clip: &Path) -> Option<String> {
    if !is_audio_file(&clip.to_string_lossy()) {
        warn!(path = %clip.display(), "file does not look like an audio clip");
    }

    helpers::print_listening();
    let result = transcriber.transcribe(clip).await;
    helpers::clear_line();

    match result {
        Ok(text) => {
            println!("{} {}", "✅ Escuché:".green(), text.bold());
            Some(text)
        }
        Err(e) => {
            warn!(provider = transcriber.display_name(), error = %e, "transcription failed");
            eprintln!("{}", e.user_message().red());
            None
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
