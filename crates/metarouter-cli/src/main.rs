//! Meta-IA Router CLI — entry point.
//!
//! # Commands
//!
//! - `metarouter chat [-m MESSAGE] [--audio FILE]` — single-shot or REPL
//! - `metarouter status` — show configuration and credential status
//! - `metarouter route QUERY` — show where a prompt would be sent

mod credentials;
mod helpers;
mod input;
mod repl;
mod status;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use metarouter_core::config::{load_config, Config};
use metarouter_core::session::Session;
use metarouter_providers::{create_provider, BackendSelection, BackendTable, ImageService, WhisperTranscriber};
use metarouter_router::{classify, Dispatcher, Router};

use crate::terminal::TerminalRenderer;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🧠 Meta-IA Router — la mejor IA del mercado, elegida para ti.
#[derive(Parser)]
#[command(name = "metarouter", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.metarouter/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the router (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Audio clip to transcribe and use as the prompt
        #[arg(short, long)]
        audio: Option<PathBuf>,

        /// Session identifier
        #[arg(short, long, default_value = "cli:default")]
        session: String,

        /// Print image links instead of opening a viewer
        #[arg(long, default_value_t = false)]
        no_open: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and credential status
    Status,

    /// Show the intent and backend a prompt would be routed to
    Route {
        /// The prompt to classify
        query: String,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(helpers::expand_tilde);

    match cli.command {
        Commands::Chat {
            message,
            audio,
            session,
            no_open,
            logs,
        } => {
            init_logging(logs);
            let mut config = load_config(config_path.as_deref());
            if no_open {
                config.image.open_in_browser = false;
            }
            run_chat(config, message, audio, session).await
        }
        Commands::Status => status::run(config_path.as_deref()),
        Commands::Route { query } => {
            let config = load_config(config_path.as_deref());
            run_route(&config, &query)
        }
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(
    mut config: Config,
    message: Option<String>,
    audio: Option<PathBuf>,
    session_key: String,
) -> Result<()> {
    config.validate().context("invalid router configuration")?;

    helpers::print_banner();
    let source = credentials::ensure_api_key(&mut config, credentials::prompt_api_key)?;
    helpers::print_connection(source);

    let router = build_router(&config)?;
    let transcriber = WhisperTranscriber::new(&config.transcription);
    let mut renderer = TerminalRenderer::new(config.image.open_in_browser);
    let mut session = Session::start(session_key);

    let message = non_blank(message);
    let prompt = match (audio, message) {
        (Some(clip), fallback) => match input::transcribe_clip(&transcriber, &clip).await {
            Some(text) => Some(text),
            None => fallback,
        },
        (None, message) => message,
    };

    match prompt {
        Some(prompt) => {
            // Single-shot mode
            info!(session = %session.key(), "processing single message");
            router
                .handle(&mut session, &prompt, &mut renderer)
                .await
                .context("request failed")?;
            session.end();
        }
        None => {
            // Interactive REPL mode
            repl::run(&router, &transcriber, session, &mut renderer).await?;
        }
    }

    Ok(())
}

/// A message that is empty after trimming counts as absent.
fn non_blank(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

/// Build a `Router` from the loaded configuration.
pub fn build_router(config: &Config) -> Result<Router> {
    let provider = create_provider(&config.providers.openrouter)
        .context("failed to create chat provider")?;
    let dispatcher = Dispatcher::from_config(Arc::new(provider), config)
        .context("invalid router configuration")?;
    Ok(Router::new(dispatcher))
}

// ─────────────────────────────────────────────
// Route command
// ─────────────────────────────────────────────

fn run_route(config: &Config, query: &str) -> Result<()> {
    let table = BackendTable::from_config(&config.router).context("invalid router configuration")?;
    let intent = classify(query);
    let selection = table.select(intent);

    println!("intent:  {intent}");
    println!("backend: {} {}", selection.icon(), selection.label());
    if let BackendSelection::Image { .. } = selection {
        println!("url:     {}", ImageService::new(&config.image).url_for(query));
    }
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("metarouter=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
