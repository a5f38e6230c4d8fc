//! Terminal renderer — draws the chat on stdout.
//!
//! Streaming frames are cumulative. Only the new suffix is written, and the
//! trailing cursor from the previous frame is erased with a backspace first.

use std::io::{self, Stdout, Write};

use colored::Colorize;
use tracing::debug;

use metarouter_core::types::Role;
use metarouter_router::{ImageDisplayError, Renderer, CURSOR};

pub struct TerminalRenderer<W: Write = Stdout> {
    out: W,
    open_images: bool,
    /// Streamed text already on screen, cursor excluded.
    shown: String,
    cursor_visible: bool,
}

impl TerminalRenderer<Stdout> {
    pub fn new(open_images: bool) -> Self {
        Self::with_writer(io::stdout(), open_images)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W, open_images: bool) -> Self {
        Self {
            out,
            open_images,
            shown: String::new(),
            cursor_visible: false,
        }
    }

    fn header(role: Role) -> String {
        match role {
            Role::User => "👤 Tú".bold().to_string(),
            Role::Assistant => "🧠 Meta-IA".cyan().bold().to_string(),
        }
    }

    fn erase_cursor(&mut self) {
        if self.cursor_visible {
            let _ = write!(self.out, "\u{8} \u{8}");
            self.cursor_visible = false;
        }
    }

    fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn message(&mut self, role: Role, content: &str) {
        let header = Self::header(role);
        self.write_line(&header);
        self.write_line(content);
        self.write_line("");
    }

    fn begin(&mut self, role: Role) {
        self.shown.clear();
        self.cursor_visible = false;
        let header = Self::header(role);
        self.write_line(&header);
    }

    fn caption(&mut self, text: &str) {
        let line = text.dimmed().to_string();
        self.write_line(&line);
    }

    fn markdown(&mut self, text: &str) {
        self.write_line(text);
    }

    fn frame(&mut self, partial: &str) {
        let text = partial.strip_suffix(CURSOR).unwrap_or(partial);
        self.erase_cursor();

        match text.strip_prefix(self.shown.as_str()) {
            Some(suffix) => {
                let _ = write!(self.out, "{suffix}");
            }
            None => {
                // Not an extension of what is on screen; start a fresh line.
                let _ = write!(self.out, "\n{text}");
            }
        }
        self.shown = text.to_string();

        let _ = write!(self.out, "{CURSOR}");
        self.cursor_visible = true;
        let _ = self.out.flush();
    }

    fn finish(&mut self, content: &str) {
        self.erase_cursor();
        if let Some(suffix) = content.strip_prefix(self.shown.as_str()) {
            let _ = write!(self.out, "{suffix}");
        }
        self.shown.clear();
        self.write_line("");
        self.write_line("");
    }

    fn image(&mut self, url: &str, caption: &str) -> Result<(), ImageDisplayError> {
        if !self.open_images {
            return Err(ImageDisplayError("image viewer disabled".into()));
        }
        open::that(url).map_err(|e| ImageDisplayError(e.to_string()))?;
        debug!(url = %url, "opened image");

        let caption = caption.dimmed().to_string();
        self.write_line(&caption);
        self.write_line(url);
        self.write_line("");
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.out).unwrap()
    }

    #[test]
    fn frames_write_only_new_text() {
        let mut r = TerminalRenderer::with_writer(Vec::new(), false);
        r.frame("Hola▌");
        r.frame("Hola mundo▌");
        r.finish("Hola mundo");

        let out = output(r);
        assert_eq!(out, "Hola▌\u{8} \u{8} mundo▌\u{8} \u{8}\n\n");
    }

    #[test]
    fn finish_without_frames_prints_content() {
        let mut r = TerminalRenderer::with_writer(Vec::new(), false);
        r.finish("todo de una vez");
        assert_eq!(output(r), "todo de una vez\n\n");
    }

    #[test]
    fn multibyte_deltas_are_not_split() {
        let mut r = TerminalRenderer::with_writer(Vec::new(), false);
        r.frame("ñ▌");
        r.frame("ñ🦀▌");
        r.finish("ñ🦀");
        let out = output(r);
        assert!(out.starts_with("ñ▌"));
        assert!(out.contains("🦀"));
    }

    #[test]
    fn disabled_viewer_refuses_images() {
        let mut r = TerminalRenderer::with_writer(Vec::new(), false);
        assert!(r.image("https://example.com/x", "Prompt: x").is_err());
        assert!(output(r).is_empty());
    }

    #[test]
    fn message_includes_content() {
        let mut r = TerminalRenderer::with_writer(Vec::new(), false);
        r.message(Role::User, "dibuja un gato");
        assert!(output(r).contains("dibuja un gato\n"));
    }
}
