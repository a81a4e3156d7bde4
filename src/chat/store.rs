//! Chat session store
//!
//! Owns the ordered list of chat sessions, the active-session pointer and
//! the set of sessions with a send in flight. Every mutation is mirrored to
//! a [`KeyValueStore`] as a full snapshot; storage is read only once, when
//! the store is loaded.
//!
//! Sending is split in two halves so the AI call can run without holding
//! the store: [`ChatSessionStore::begin_send`] records the user message and
//! returns a [`PendingSend`] that remembers its originating session, and
//! [`ChatSessionStore::complete_send`] attaches the reply to that session,
//! whichever session is active by then.

use std::collections::HashSet;
use std::sync::Arc;

use ulid::Ulid;

use crate::chat::clock::{Clock, SystemClock};
use crate::chat::markup::normalize_markup;
use crate::chat::types::{ChatSession, Message, DEFAULT_TITLE, DEFAULT_TITLE_MAX_CHARS};
use crate::error::{CareerError, Result};
use crate::storage::{KeyValueStore, ACTIVE_SESSION_KEY, SESSIONS_KEY};

/// Why a send was not started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The text was empty after trimming
    EmptyMessage,
    /// No session is active
    NoActiveSession,
    /// A send is already pending for the active session
    InFlight,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "message is empty"),
            Self::NoActiveSession => write!(f, "no active chat session"),
            Self::InFlight => write!(f, "a reply is still pending for this session"),
        }
    }
}

/// A send whose user message is recorded and whose reply is outstanding
///
/// Only [`ChatSessionStore::begin_send`] creates these.
#[derive(Debug)]
pub struct PendingSend {
    session_id: String,
    prompt: String,
}

impl PendingSend {
    /// Session the reply belongs to
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Trimmed text to hand to the AI provider
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Result of `begin_send`
#[derive(Debug)]
pub enum SendStart {
    Pending(PendingSend),
    Ignored(Rejection),
}

/// Final result of a send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was sent; no state changed
    Ignored(Rejection),
    /// The reply was appended to its originating session
    Replied { session_id: String, message: Message },
    /// The originating session was deleted before the reply arrived
    Discarded { session_id: String },
}

/// Reads the persisted session list and last-active id
///
/// Missing or malformed data yields an empty list. An active id that names
/// no loaded session is dropped.
pub fn load_from_storage(storage: &dyn KeyValueStore) -> (Vec<ChatSession>, Option<String>) {
    let sessions = match storage.get(SESSIONS_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<Vec<ChatSession>>(&raw) {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!("Persisted chat sessions are malformed, ignoring: {}", e);
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to read persisted chat sessions: {}", e);
            Vec::new()
        }
    };

    let mut seen = HashSet::new();
    let sessions: Vec<ChatSession> = sessions
        .into_iter()
        .filter(|s| {
            let fresh = seen.insert(s.id.clone());
            if !fresh {
                tracing::warn!(id = %s.id, "Dropping duplicate persisted chat session");
            }
            fresh
        })
        .collect();

    let active_id = match storage.get(ACTIVE_SESSION_KEY) {
        Ok(id) => id.filter(|id| sessions.iter().any(|s| &s.id == id)),
        Err(e) => {
            tracing::warn!("Failed to read active chat id: {}", e);
            None
        }
    };

    (sessions, active_id)
}

/// In-memory owner of all chat sessions, mirrored to durable storage
pub struct ChatSessionStore {
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    in_flight: HashSet<String>,
    storage: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    title_max_chars: usize,
}

impl std::fmt::Debug for ChatSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSessionStore")
            .field("sessions", &self.sessions.len())
            .field("active_id", &self.active_id)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl ChatSessionStore {
    /// Load the store from `storage`, falling back to an empty state
    ///
    /// # Examples
    ///
    /// ```
    /// use careerchat::chat::ChatSessionStore;
    /// use careerchat::storage::MemoryKeyValueStore;
    ///
    /// let mut store = ChatSessionStore::load(Box::new(MemoryKeyValueStore::new()));
    /// assert!(store.sessions().is_empty());
    ///
    /// let id = store.create_session().unwrap();
    /// assert_eq!(store.active_id(), Some(id.as_str()));
    /// ```
    pub fn load(storage: Box<dyn KeyValueStore>) -> Self {
        let (sessions, active_id) = load_from_storage(storage.as_ref());
        tracing::debug!(
            sessions = sessions.len(),
            active = ?active_id,
            "Loaded chat sessions"
        );

        Self {
            sessions,
            active_id,
            in_flight: HashSet::new(),
            storage,
            clock: Arc::new(SystemClock),
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }

    /// Use `clock` for all new timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Number of characters kept in derived titles
    pub fn with_title_max_chars(mut self, max_chars: usize) -> Self {
        self.title_max_chars = max_chars.max(1);
        self
    }

    /// All sessions, most recently created first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        self.active_id.as_deref().and_then(|id| self.session(id))
    }

    /// Messages of the active session; empty when no session is active
    pub fn active_messages(&self) -> &[Message] {
        self.active_session()
            .map(|s| s.messages.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a reply is outstanding for session `id`
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    /// Whether the active session is waiting for a reply
    pub fn is_active_pending(&self) -> bool {
        self.active_id
            .as_deref()
            .is_some_and(|id| self.in_flight.contains(id))
    }

    /// Create an empty session at the front of the list and make it active
    pub fn create_session(&mut self) -> Result<String> {
        let mut id = Ulid::new().to_string();
        while self.session(&id).is_some() {
            id = Ulid::new().to_string();
        }

        let now = self.clock.now_millis();
        self.sessions.insert(0, ChatSession::new(id.clone(), now));
        self.active_id = Some(id.clone());
        tracing::info!(id = %id, "Created chat session");

        self.persist()?;
        Ok(id)
    }

    /// Make session `id` active
    pub fn switch_session(&mut self, id: &str) -> Result<()> {
        if self.session(id).is_none() {
            return Err(CareerError::SessionNotFound(id.to_string()).into());
        }

        self.active_id = Some(id.to_string());
        tracing::debug!(id = %id, "Switched chat session");
        self.persist()
    }

    /// Delete session `id`
    ///
    /// Deleting the active session activates the first remaining session,
    /// or none when the list becomes empty.
    pub fn delete_session(&mut self, id: &str) -> Result<()> {
        let Some(index) = self.sessions.iter().position(|s| s.id == id) else {
            return Err(CareerError::SessionNotFound(id.to_string()).into());
        };

        self.sessions.remove(index);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.sessions.first().map(|s| s.id.clone());
        }
        tracing::info!(id = %id, active = ?self.active_id, "Deleted chat session");

        self.persist()
    }

    /// Rename session `id`; a blank title restores the derived default
    pub fn rename_session(&mut self, id: &str, new_title: &str) -> Result<()> {
        let now = self.clock.now_millis();
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CareerError::SessionNotFound(id.to_string()))?;

        let trimmed = new_title.trim();
        if trimmed.is_empty() {
            session.custom_title = false;
            session.title = DEFAULT_TITLE.to_string();
        } else {
            session.custom_title = true;
            session.title = trimmed.to_string();
        }
        session.updated_at = session.updated_at.max(now);

        self.persist()
    }

    /// Empty the active session's messages; the session itself remains
    pub fn clear_active_session(&mut self) -> Result<()> {
        let max_chars = self.title_max_chars;
        let now = self.clock.now_millis();
        let Some(session) = self.active_session_mut() else {
            return Ok(());
        };

        session.messages.clear();
        session.refresh_title(max_chars);
        session.updated_at = session.updated_at.max(now);
        tracing::debug!(id = %session.id, "Cleared chat session");

        self.persist()
    }

    /// Record the user message and mark the active session as in flight
    ///
    /// Nothing changes when the text is blank, no session is active, or the
    /// active session already has a send in flight. If the user message
    /// cannot be persisted it is rolled back and the error returned.
    pub fn begin_send(&mut self, text: &str) -> Result<SendStart> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Ok(SendStart::Ignored(Rejection::EmptyMessage));
        }

        let Some(session_id) = self.active_id.clone() else {
            return Ok(SendStart::Ignored(Rejection::NoActiveSession));
        };
        if self.in_flight.contains(&session_id) {
            return Ok(SendStart::Ignored(Rejection::InFlight));
        }

        let max_chars = self.title_max_chars;
        let now = self.clock.now_millis();
        let Some(session) = self.active_session_mut() else {
            return Ok(SendStart::Ignored(Rejection::NoActiveSession));
        };
        let previous = (session.title.clone(), session.updated_at);

        session.push_message(Message::user(prompt, now));
        session.refresh_title(max_chars);

        if let Err(e) = self.persist() {
            if let Some(session) = self.active_session_mut() {
                session.messages.pop();
                (session.title, session.updated_at) = previous;
            }
            return Err(e);
        }

        self.in_flight.insert(session_id.clone());
        tracing::debug!(id = %session_id, "Send started");

        Ok(SendStart::Pending(PendingSend {
            session_id,
            prompt: prompt.to_string(),
        }))
    }

    /// Attach the provider's reply to the session the send started from
    ///
    /// A failed reply leaves the user message in place and is returned as a
    /// [`CareerError::Provider`]. A reply for a session deleted in the
    /// meantime is discarded.
    pub fn complete_send(
        &mut self,
        pending: PendingSend,
        reply: Result<String>,
    ) -> Result<SendOutcome> {
        let PendingSend { session_id, .. } = pending;
        self.in_flight.remove(&session_id);

        let text = match reply {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(id = %session_id, "AI response failed: {:#}", e);
                return Err(as_provider_error(e));
            }
        };

        let max_chars = self.title_max_chars;
        let now = self.clock.now_millis();
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            tracing::info!(id = %session_id, "Discarding reply for deleted chat session");
            return Ok(SendOutcome::Discarded { session_id });
        };

        session.push_message(Message::assistant(normalize_markup(&text), now));
        session.refresh_title(max_chars);
        let message = session
            .messages
            .last()
            .cloned()
            .ok_or_else(|| CareerError::Storage("reply was not recorded".to_string()))?;
        tracing::debug!(id = %session_id, "Reply attached");

        self.persist()?;
        Ok(SendOutcome::Replied {
            session_id,
            message,
        })
    }

    /// Forget an in-flight marker whose reply will never be delivered
    pub fn abandon_send(&mut self, session_id: &str) {
        if self.in_flight.remove(session_id) {
            tracing::debug!(id = %session_id, "Send abandoned");
        }
    }

    fn active_session_mut(&mut self) -> Option<&mut ChatSession> {
        let id = self.active_id.as_deref()?;
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Write the full session list and active id as one batch
    fn persist(&mut self) -> Result<()> {
        let snapshot = serde_json::to_string(&self.sessions).map_err(|e| {
            CareerError::Storage(format!("failed to encode chat sessions: {}", e))
        })?;

        self.storage
            .set_many(&[
                (SESSIONS_KEY, Some(snapshot.as_str())),
                (ACTIVE_SESSION_KEY, self.active_id.as_deref()),
            ])
            .map_err(|e| {
                tracing::error!("Failed to persist chat sessions: {:#}", e);
                e
            })
    }
}

fn as_provider_error(err: anyhow::Error) -> anyhow::Error {
    match err.downcast_ref::<CareerError>() {
        Some(CareerError::Provider(_)) => err,
        _ => CareerError::Provider(format!("{:#}", err)).into(),
    }
}
