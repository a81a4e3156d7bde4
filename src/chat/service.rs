//! Async front of the chat session store
//!
//! [`ChatService`] shares the store behind a mutex and drives a send
//! through the AI provider. The lock is taken only around the synchronous
//! halves of a send, never across the provider call, so other callers can
//! switch, create or delete sessions while a reply is pending.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::chat::store::{ChatSessionStore, SendOutcome, SendStart};
use crate::chat::types::{ChatSession, Message};
use crate::error::{CareerError, Result};
use crate::providers::Provider;

/// Shared handle over a [`ChatSessionStore`] and the AI provider
#[derive(Clone)]
pub struct ChatService {
    store: Arc<Mutex<ChatSessionStore>>,
    provider: Arc<dyn Provider>,
}

impl ChatService {
    /// Wrap `store` and `provider`
    pub fn new(store: ChatSessionStore, provider: Arc<dyn Provider>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            provider,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ChatSessionStore>> {
        self.store
            .lock()
            .map_err(|_| CareerError::Storage("chat store lock poisoned".to_string()).into())
    }

    /// Run `f` with exclusive access to the store
    pub fn with_store<R>(&self, f: impl FnOnce(&mut ChatSessionStore) -> R) -> Result<R> {
        let mut store = self.lock()?;
        Ok(f(&mut store))
    }

    pub fn create_session(&self) -> Result<String> {
        self.lock()?.create_session()
    }

    pub fn switch_session(&self, id: &str) -> Result<()> {
        self.lock()?.switch_session(id)
    }

    pub fn delete_session(&self, id: &str) -> Result<()> {
        self.lock()?.delete_session(id)
    }

    pub fn rename_session(&self, id: &str, title: &str) -> Result<()> {
        self.lock()?.rename_session(id, title)
    }

    pub fn clear_active_session(&self) -> Result<()> {
        self.lock()?.clear_active_session()
    }

    /// Snapshot of all sessions
    pub fn sessions(&self) -> Result<Vec<ChatSession>> {
        Ok(self.lock()?.sessions().to_vec())
    }

    pub fn active_id(&self) -> Result<Option<String>> {
        Ok(self.lock()?.active_id().map(str::to_string))
    }

    /// Snapshot of the active session's messages
    pub fn active_messages(&self) -> Result<Vec<Message>> {
        Ok(self.lock()?.active_messages().to_vec())
    }

    /// Whether the active session is waiting for a reply
    pub fn is_active_pending(&self) -> Result<bool> {
        Ok(self.lock()?.is_active_pending())
    }

    /// Send `text` from the active session and wait for the reply
    ///
    /// Returns [`SendOutcome::Ignored`] for blank input, no active session or
    /// a send already pending on the active session. A provider failure is
    /// returned as [`CareerError::Provider`]; the user message stays in the
    /// transcript either way.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome> {
        let start = self.lock()?.begin_send(text)?;
        let pending = match start {
            SendStart::Pending(pending) => pending,
            SendStart::Ignored(reason) => {
                tracing::debug!("Send ignored: {}", reason);
                return Ok(SendOutcome::Ignored(reason));
            }
        };

        let guard = InFlightGuard {
            store: &self.store,
            session_id: pending.session_id().to_string(),
            armed: true,
        };

        tracing::info!(
            id = %pending.session_id(),
            provider = self.provider.name(),
            "Requesting AI response"
        );
        let reply = self.provider.respond(pending.prompt()).await;

        guard.disarm();
        self.lock()?.complete_send(pending, reply)
    }
}

/// Clears the in-flight marker if a send future is dropped mid-call
struct InFlightGuard<'a> {
    store: &'a Mutex<ChatSessionStore>,
    session_id: String,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Ok(mut store) = self.store.lock() {
                store.abandon_send(&self.session_id);
            }
        }
    }
}
