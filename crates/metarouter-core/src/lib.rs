//! Meta-IA Router core — shared types, session transcript, configuration.
//!
//! - [`types`] — transcript messages and chat-completion wire types
//! - [`session`] — explicit session context and its append-only transcript
//! - [`config`] — JSON config schema, loader, env overrides
//! - [`utils`] — data-directory paths and small string helpers

pub mod config;
pub mod session;
pub mod types;
pub mod utils;
