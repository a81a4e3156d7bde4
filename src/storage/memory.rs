//! In-memory key-value store
//!
//! Clones share the same underlying map, so a test can hand one clone to a
//! [`ChatSessionStore`](crate::chat::ChatSessionStore) and inspect what was
//! persisted through another.

use super::KeyValueStore;
use crate::error::{CareerError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, String>,
    fail_writes: bool,
    fail_key: Option<String>,
    writes: usize,
}

impl Inner {
    fn rejects(&self, key: &str) -> bool {
        self.fail_writes || self.fail_key.as_deref() == Some(key)
    }
}

/// Key-value store backed by a shared `HashMap`
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store
    ///
    /// # Examples
    ///
    /// ```
    /// use careerchat::storage::{KeyValueStore, MemoryKeyValueStore};
    ///
    /// let mut store = MemoryKeyValueStore::new();
    /// store.set("k", "v").unwrap();
    /// assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.lock() {
            inner.entries = entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect();
        }
        store
    }

    /// Make every subsequent `set`/`remove` fail with a storage error
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    /// Make every subsequent write touching `key` fail with a storage error
    pub fn set_fail_key(&self, key: Option<&str>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_key = key.map(str::to_string);
        }
    }

    /// Number of successful writes (`set`, `remove` or one `set_many` batch) so far
    pub fn write_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| CareerError::Storage("memory store lock poisoned".to_string()).into())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, Some(value))])
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.set_many(&[(key, None)])
    }

    fn set_many(&mut self, entries: &[(&str, Option<&str>)]) -> Result<()> {
        let mut inner = self.lock()?;
        if let Some((key, _)) = entries.iter().find(|(key, _)| inner.rejects(key)) {
            return Err(CareerError::Storage(format!("write to {} rejected", key)).into());
        }

        for (key, value) in entries {
            match value {
                Some(value) => {
                    inner.entries.insert(key.to_string(), value.to_string());
                }
                None => {
                    inner.entries.remove(*key);
                }
            }
        }
        inner.writes += 1;
        Ok(())
    }
}
