//! `metarouter status` — show configuration and credential status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use metarouter_core::config::{get_config_path, load_config};
use metarouter_core::utils::mask_secret;
use metarouter_providers::{ImageService, WhisperTranscriber, OPENROUTER};

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    println!();
    println!("{}", "🧠 Meta-IA Router Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        if path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Routing table
    println!("  {:<18} {}", "Text model:".bold(), config.router.text_model);
    println!("  {:<18} {}", "Code model:".bold(), config.router.code_model);
    println!(
        "  {:<18} {}",
        "Max tokens:".bold(),
        config.router.max_tokens.to_string().dimmed()
    );
    if let Err(e) = config.validate() {
        println!("  {:<18} {}", "".bold(), format!("✗ {e}").red());
    }

    // Credentials
    println!();
    println!("  {}", "Providers:".bold());
    let openrouter = &config.providers.openrouter;
    let chat_status = if openrouter.is_configured() {
        format!("{} ({})", "✓".green(), mask_secret(&openrouter.api_key))
    } else {
        format!(
            "{}",
            format!("· not set (export {})", OPENROUTER.env_key).dimmed()
        )
    };
    println!("    {:<20} {}", OPENROUTER.display_name, chat_status);

    let voice_status = if WhisperTranscriber::new(&config.transcription).is_configured() {
        format!("{} (key set)", "✓".green())
    } else {
        format!("{}", "· not configured".dimmed())
    };
    println!("    {:<20} {}", "Whisper", voice_status);

    // Images
    println!();
    let sample = ImageService::new(&config.image).url_for("prompt");
    println!("  {:<18} {}", "Image service:".bold(), sample.dimmed());
    println!(
        "  {:<18} {}",
        "Open images:".bold(),
        if config.image.open_in_browser { "yes" } else { "no" }
    );

    println!();

    Ok(())
}
