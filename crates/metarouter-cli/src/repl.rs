//! Interactive REPL.
//!
//! Uses `rustyline` for line editing. In-memory history only; nothing is
//! written to disk.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info};

use metarouter_core::session::Session;
use metarouter_core::utils::truncate_string;
use metarouter_providers::WhisperTranscriber;
use metarouter_router::{replay, Router};

use crate::helpers;
use crate::input::{self, ReplCommand};
use crate::terminal::TerminalRenderer;

/// Run the interactive REPL loop until the user exits.
pub async fn run(
    router: &Router,
    transcriber: &WhisperTranscriber,
    mut session: Session,
    renderer: &mut TerminalRenderer,
) -> Result<()> {
    helpers::print_hint();
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline("Tú: ") {
            Ok(line) => line,
            // Ctrl-C / Ctrl-D
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let prompt = match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Exit => {
                println!("\n¡Hasta luego! 👋");
                break;
            }
            ReplCommand::History => {
                let _ = editor.add_history_entry(line.trim());
                replay(&session, renderer);
                continue;
            }
            ReplCommand::NewSession => {
                let key = session.key().to_string();
                let summary = session.end();
                info!(session = %key, messages = summary.messages, "session reset");
                session = Session::start(key);
                println!("🆕 Nueva conversación.\n");
                continue;
            }
            ReplCommand::Usage(usage) => {
                eprintln!("Uso: {usage}");
                continue;
            }
            ReplCommand::Voice(clip) => {
                let _ = editor.add_history_entry(line.trim());
                match input::transcribe_clip(transcriber, &clip).await {
                    Some(text) => text,
                    None => continue,
                }
            }
            ReplCommand::Prompt(text) => {
                let _ = editor.add_history_entry(&text);
                text
            }
        };

        debug!(session = %session.key(), input = %truncate_string(&prompt, 80), "processing input");
        println!();
        if let Err(e) = router.handle(&mut session, &prompt, renderer).await {
            helpers::print_error(&e.to_string());
        }
    }

    let summary = session.end();
    info!(session = %summary.key, messages = summary.messages, "session ended");
    Ok(())
}
