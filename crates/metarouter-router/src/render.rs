//! Renderer trait — how the routing core talks to whatever draws the chat.
//!
//! The core never formats output itself. It hands (role, content) pairs,
//! captions, and streaming frames to a [`Renderer`].

use metarouter_core::types::Role;
use thiserror::Error;

/// Marker appended to in-progress streaming frames.
pub const CURSOR: &str = "▌";

/// The renderer could not show an image inline.
#[derive(Debug, Error)]
#[error("cannot display image: {0}")]
pub struct ImageDisplayError(pub String);

/// Front-end sink for chat output. All calls are synchronous and in order.
pub trait Renderer {
    /// Draw a complete message (history replay or a fresh user prompt).
    fn message(&mut self, role: Role, content: &str);

    /// Open a new message block for `role`.
    fn begin(&mut self, role: Role);

    /// Small status line inside the current block.
    fn caption(&mut self, text: &str);

    /// Markdown content inside the current block.
    fn markdown(&mut self, text: &str);

    /// Re-draw the in-progress streamed content. `partial` ends with [`CURSOR`].
    fn frame(&mut self, partial: &str);

    /// Final streamed content, without the cursor.
    fn finish(&mut self, content: &str);

    /// Show the image at `url`.
    fn image(&mut self, url: &str, caption: &str) -> Result<(), ImageDisplayError>;
}
