//! Meta-IA Router — routing core.
//!
//! This crate contains:
//! - **classifier**: keyword-based intent detection (image / code / text)
//! - **dispatcher**: runs one prompt against the backend chosen for its intent
//! - **pipeline**: a full turn (record, classify, dispatch, record) on a session
//! - **render**: the renderer trait every front-end implements

pub mod classifier;
pub mod dispatcher;
pub mod pipeline;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::classify;
pub use dispatcher::{DispatchError, Dispatcher, IMAGE_ACK};
pub use pipeline::{replay, Router, Turn};
pub use render::{ImageDisplayError, Renderer, CURSOR};
