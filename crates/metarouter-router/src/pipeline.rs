//! Turn pipeline — one prompt in, one transcript exchange out.
//!
//! A turn renders and records the user prompt, classifies it, dispatches
//! it, and records the assistant reply. Turns run one at a time against a
//! session borrowed mutably, so the transcript never sees interleaving.

use tracing::debug;

use metarouter_core::session::Session;
use metarouter_core::types::{Message, Role, RoutingIntent};
use metarouter_providers::BackendSelection;

use crate::classifier::classify;
use crate::dispatcher::{DispatchError, Dispatcher};
use crate::render::Renderer;

/// Outcome of a successful turn.
#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    pub intent: RoutingIntent,
    pub selection: BackendSelection,
    pub reply: Message,
}

/// Classifier + dispatcher, driven one prompt at a time.
pub struct Router {
    dispatcher: Dispatcher,
}

impl Router {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Intent and backend for `prompt`, without calling anything.
    pub fn route(&self, prompt: &str) -> (RoutingIntent, BackendSelection) {
        let intent = classify(prompt);
        (intent, self.dispatcher.select(intent))
    }

    /// Run a full turn on `session`.
    ///
    /// The user message is recorded before dispatch. On failure no assistant
    /// message is recorded and the error is returned as-is.
    pub async fn handle(
        &self,
        session: &mut Session,
        prompt: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<Turn, DispatchError> {
        renderer.message(Role::User, prompt);
        session.record(Message::user(prompt));

        let (intent, selection) = self.route(prompt);
        debug!(session = session.key(), intent = %intent, backend = selection.label(), "routed");

        let reply = self
            .dispatcher
            .dispatch(prompt, intent, session.transcript(), renderer)
            .await?;
        session.record(reply.clone());

        Ok(Turn {
            intent,
            selection,
            reply,
        })
    }
}

/// Re-render every message of the session, oldest first.
pub fn replay(session: &Session, renderer: &mut dyn Renderer) {
    for message in session.transcript() {
        renderer.message(message.role(), message.content());
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
