//! Chat data model: messages, sessions and title derivation

use serde::{Deserialize, Serialize};

/// Title given to sessions with no messages
pub const DEFAULT_TITLE: &str = "New Chat";

/// Number of characters of the first message kept in a derived title
pub const DEFAULT_TITLE_MAX_CHARS: usize = 30;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a chat session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Creation instant in milliseconds since the epoch
    pub timestamp: i64,
}

impl Message {
    /// Creates a user message
    ///
    /// # Examples
    ///
    /// ```
    /// use careerchat::chat::{Message, Role};
    ///
    /// let msg = Message::user("hello", 1_700_000_000_000);
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp,
        }
    }

    /// Creates an assistant message
    pub fn assistant(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp,
        }
    }
}

/// A named, ordered conversation thread
///
/// Serialized in camelCase so the persisted form matches the browser
/// local-storage payload of the web client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    /// Set once the user renames the session; custom titles are never re-derived
    #[serde(default, skip_serializing_if = "is_false")]
    pub custom_title: bool,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ChatSession {
    /// Creates an empty session titled [`DEFAULT_TITLE`]
    pub fn new(id: impl Into<String>, now: i64) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            custom_title: false,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Timestamp of the last message, if any
    pub fn last_timestamp(&self) -> Option<i64> {
        self.messages.last().map(|m| m.timestamp)
    }

    /// Appends a message, clamping its timestamp so ordering never regresses
    pub fn push_message(&mut self, mut message: Message) {
        if let Some(last) = self.last_timestamp() {
            message.timestamp = message.timestamp.max(last);
        }
        self.updated_at = self.updated_at.max(message.timestamp);
        self.messages.push(message);
    }

    /// Re-derives the title from the current first message unless it is custom
    pub fn refresh_title(&mut self, max_chars: usize) {
        if !self.custom_title {
            self.title = derive_title(&self.messages, max_chars);
        }
    }
}

/// Derives a session title from the first message currently in `messages`
///
/// Keeps the first `max_chars` characters and appends `...` only when the
/// content was cut. An empty list (or empty first message) yields
/// [`DEFAULT_TITLE`].
///
/// # Examples
///
/// ```
/// use careerchat::chat::{derive_title, Message};
///
/// let long = vec![Message::user("Explain quantum computing in simple terms please", 0)];
/// assert_eq!(derive_title(&long, 30), "Explain quantum computing in s...");
///
/// let short = vec![Message::user("hello", 0)];
/// assert_eq!(derive_title(&short, 30), "hello");
///
/// assert_eq!(derive_title(&[], 30), "New Chat");
/// ```
pub fn derive_title(messages: &[Message], max_chars: usize) -> String {
    let Some(first) = messages.first() else {
        return DEFAULT_TITLE.to_string();
    };

    let content = first.content.trim();
    if content.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    if content.chars().count() > max_chars {
        let mut title: String = content.chars().take(max_chars).collect();
        title.push_str("...");
        title
    } else {
        content.to_string()
    }
}
