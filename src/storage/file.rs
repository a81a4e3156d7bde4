//! File-backed key-value store
//!
//! All keys live in a single JSON document. Every write rewrites the whole
//! document to a temporary sibling and renames it over the original, so a
//! reader never observes a half-written file.

use super::KeyValueStore;
use crate::error::{CareerError, Result};
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Key-value store persisted as one JSON object on disk
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileKeyValueStore {
    /// Open the store at `path`, creating parent directories as needed
    ///
    /// A missing file yields an empty store. A file that is not a JSON
    /// object of strings is treated as absent and logged; it is replaced on
    /// the next write.
    ///
    /// # Examples
    ///
    /// ```
    /// use careerchat::storage::{FileKeyValueStore, KeyValueStore};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let mut store = FileKeyValueStore::open(dir.path().join("state.json")).unwrap();
    /// store.set("currentChatId", "abc").unwrap();
    /// assert_eq!(store.get("currentChatId").unwrap().as_deref(), Some("abc"));
    /// ```
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context("Failed to create parent directory for state file")
                    .map_err(|e| CareerError::Storage(e.to_string()))?;
            }
        }

        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        "State file is malformed, starting empty: {}",
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(CareerError::Storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                ))
                .into())
            }
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened state file");
        Ok(Self { path, entries })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| CareerError::Storage(format!("failed to encode state: {}", e)))?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, bytes).map_err(|e| {
            CareerError::Storage(format!("failed to write {}: {}", tmp_path.display(), e))
        })?;

        let replace_err = |e: io::Error| {
            CareerError::Storage(format!("failed to replace {}: {}", self.path.display(), e))
        };
        match fs::rename(&tmp_path, &self.path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                // Some platforms refuse to rename over an existing file.
                if self.path.exists() {
                    fs::remove_file(&self.path).map_err(replace_err)?;
                    fs::rename(&tmp_path, &self.path).map_err(replace_err)?;
                    Ok(())
                } else {
                    Err(replace_err(rename_err).into())
                }
            }
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, Some(value))])
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        self.set_many(&[(key, None)])
    }

    fn set_many(&mut self, entries: &[(&str, Option<&str>)]) -> Result<()> {
        let previous = self.entries.clone();
        for (key, value) in entries {
            match value {
                Some(value) => {
                    self.entries.insert(key.to_string(), value.to_string());
                }
                None => {
                    self.entries.remove(*key);
                }
            }
        }

        if let Err(e) = self.flush() {
            // Keep memory consistent with what is on disk.
            self.entries = previous;
            return Err(e);
        }
        Ok(())
    }
}
