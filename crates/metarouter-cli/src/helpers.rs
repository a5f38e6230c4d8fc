//! Shared CLI helpers — path expansion, banner, status lines.

use std::path::PathBuf;

use colored::Colorize;

use crate::credentials::CredentialSource;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print the banner shown when a chat starts.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🧠 Meta-IA Router".cyan().bold(), version.dimmed());
    println!("{}", "La mejor IA del mercado, elegida para ti.".dimmed());
    println!();
}

/// Report where the API key came from.
pub fn print_connection(source: CredentialSource) {
    if source == CredentialSource::Configured {
        println!("{}", "✅ Sistema Conectado".green());
        println!();
    }
}

/// Print the REPL usage hint.
pub fn print_hint() {
    println!(
        "{}",
        "Escribe tu consulta, \"/voz <archivo>\" para dictar, \"/historial\", \"/nueva\" o \"salir\"."
            .dimmed()
    );
    println!();
}

/// Print a "transcribing" placeholder.
pub fn print_listening() {
    eprint!("{}", "⠿ Escuchando y transcribiendo...".dimmed());
}

/// Clear a placeholder line.
pub fn clear_line() {
    eprint!("\r{}\r", " ".repeat(40));
}

/// Print a recoverable error inline.
pub fn print_error(message: &str) {
    eprintln!("\n{} {}\n", "❌ Error:".red().bold(), message);
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/foo/bar");
        assert!(result.ends_with("foo/bar"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        let result = expand_tilde("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn expand_tilde_relative() {
        let result = expand_tilde("relative/path");
        assert_eq!(result, PathBuf::from("relative/path"));
    }
}
