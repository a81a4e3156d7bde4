//! Test utilities for careerchat
//!
//! Shared fixtures for unit tests: in-memory session stores driven by a
//! manual clock, temporary directories and a config rooted in one.

use crate::chat::{ChatSessionStore, ManualClock};
use crate::config::Config;
use crate::error::CareerError;
use crate::storage::MemoryKeyValueStore;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// A session store over shared in-memory storage with a clock starting at `start_millis`
///
/// The returned storage handle sees every write the store makes.
pub fn memory_store(start_millis: i64) -> (ChatSessionStore, MemoryKeyValueStore, Arc<ManualClock>) {
    let storage = MemoryKeyValueStore::new();
    let clock = Arc::new(ManualClock::new(start_millis));
    let store = ChatSessionStore::load(Box::new(storage.clone())).with_clock(clock.clone());
    (store, storage, clock)
}

/// Default config with every on-disk path under `dir`
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.chat.state_path = Some(dir.join("sessions.json").to_string_lossy().into_owned());
    config.history.db_path = Some(dir.join("history.db").to_string_lossy().into_owned());
    config.history.export_dir = dir.join("exports").to_string_lossy().into_owned();
    config
}

/// The [`CareerError`] behind an `anyhow` error, if any
pub fn career_error(err: &anyhow::Error) -> Option<&CareerError> {
    err.downcast_ref::<CareerError>()
}
