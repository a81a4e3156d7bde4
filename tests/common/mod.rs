use async_trait::async_trait;
use careerchat::chat::ChatSessionStore;
use careerchat::error::{CareerError, Result};
use careerchat::providers::Provider;
use careerchat::storage::{FileKeyValueStore, SqliteHistoryStore};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Open a file-backed session store at `path`
#[allow(dead_code)]
pub fn open_store(path: &Path) -> ChatSessionStore {
    let storage = FileKeyValueStore::open(path).expect("failed to open state file");
    ChatSessionStore::load(Box::new(storage))
}

#[allow(dead_code)]
pub fn create_temp_history() -> (SqliteHistoryStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("history.db");
    let store =
        SqliteHistoryStore::new_with_path(db_path).expect("failed to create history store");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Provider that answers with a fixed prefix and counts calls
#[allow(dead_code)]
pub struct EchoProvider {
    pub calls: AtomicUsize,
    pub fail: bool,
}

#[allow(dead_code)]
impl EchoProvider {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for EchoProvider {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn respond(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CareerError::Provider("service unavailable".to_string()).into());
        }
        Ok(format!("**Echo:** {}", prompt))
    }
}
