//! Durable storage for CareerChat
//!
//! Two kinds of storage live here:
//!
//! - a key-value port ([`KeyValueStore`]) that the chat session store mirrors
//!   its state into, with a file-backed and an in-memory implementation
//! - the SQLite-backed history of generated career artifacts

use crate::error::{CareerError, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub mod file;
pub mod history;
pub mod memory;
pub mod types;

pub use file::FileKeyValueStore;
pub use history::SqliteHistoryStore;
pub use memory::MemoryKeyValueStore;
pub use types::{HistoryItem, HistoryKind, NewHistoryItem};

/// Key holding the serialized chat session list
pub const SESSIONS_KEY: &str = "chatSessions";

/// Key holding the id of the last active chat session
pub const ACTIVE_SESSION_KEY: &str = "currentChatId";

/// Text key-value storage used as a passive mirror of in-memory state
///
/// Reads and writes are synchronous. Each `set` replaces the whole value for
/// the key; implementations must never leave a partially written value
/// behind. A [`set_many`](KeyValueStore::set_many) batch is stored whole or
/// not at all.
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Apply all `entries` in one write; a `None` value removes the key
    ///
    /// On error no entry has been applied.
    fn set_many(&mut self, entries: &[(&str, Option<&str>)]) -> Result<()>;
}

/// Platform data directory for CareerChat (e.g. `~/.local/share/careerchat`)
pub fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "careerchat", "careerchat")
        .ok_or_else(|| CareerError::Storage("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
