//! careerchat - career guidance library
//!
//! This library provides a multi-session AI chat with durable local
//! persistence, plus roadmap generation, job-description keyword extraction
//! and a per-user history of the generated artifacts.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Session store, async chat service and reply markup normalization
//! - `storage`: Key-value persistence for sessions and the SQLite artifact history
//! - `providers`: AI provider abstraction and the Gemini implementation
//! - `career`: Roadmap, keyword extraction and Markdown export
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```
//! use careerchat::chat::ChatSessionStore;
//! use careerchat::storage::MemoryKeyValueStore;
//!
//! let mut store = ChatSessionStore::load(Box::new(MemoryKeyValueStore::new()));
//! let id = store.create_session()?;
//! store.rename_session(&id, "Interview prep")?;
//! assert_eq!(store.active_session().unwrap().title, "Interview prep");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod career;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use chat::{ChatService, ChatSessionStore};
pub use config::Config;
pub use error::{CareerError, Result};

#[cfg(test)]
pub mod test_utils;
