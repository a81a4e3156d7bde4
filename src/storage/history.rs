use crate::error::{CareerError, Result};
use crate::storage::types::{HistoryItem, HistoryKind, NewHistoryItem};
use anyhow::Context;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use ulid::Ulid;

/// Storage backend for generated roadmaps and keyword analyses
pub struct SqliteHistoryStore {
    db_path: PathBuf,
}

impl SqliteHistoryStore {
    /// Create a new history store in the user's data directory
    pub fn new() -> Result<Self> {
        // Allow pointing the binary at an alternate database without
        // touching the user's data directory.
        if let Ok(override_path) = std::env::var("CAREERCHAT_HISTORY_DB") {
            return Self::new_with_path(override_path);
        }

        let db_path = crate::storage::default_data_dir()?.join("history.db");
        Self::new_with_path(db_path)
    }

    /// Create a history store that uses the specified database path.
    ///
    /// # Examples
    ///
    /// ```
    /// use careerchat::storage::SqliteHistoryStore;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = SqliteHistoryStore::new_with_path(dir.path().join("history.db")).unwrap();
    /// assert!(store.list_for_user("nobody").unwrap().is_empty());
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create parent directory for database")
                    .map_err(|e| CareerError::Storage(e.to_string()))?;
            }
        }

        let store = Self { db_path };
        store.init()?;
        Ok(store)
    }

    fn open(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| CareerError::Storage(e.to_string()).into())
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS history (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                query TEXT NOT NULL,
                data JSON NOT NULL,
                timestamp INTEGER NOT NULL
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(|e| CareerError::Storage(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_history_user ON history(user_id, timestamp DESC)",
            [],
        )
        .context("Failed to create index")
        .map_err(|e| CareerError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Store a new artifact and return its generated id
    ///
    /// The timestamp is taken from the local clock at insertion time.
    pub fn add(&self, item: NewHistoryItem) -> Result<String> {
        if item.user_id.trim().is_empty() {
            return Err(CareerError::InvalidInput("user id must not be empty".to_string()).into());
        }

        let conn = self.open()?;
        let id = Ulid::new().to_string();
        let timestamp = Utc::now().timestamp_millis();
        let data_json = serde_json::to_string(&item.data)
            .context("Failed to serialize history data")
            .map_err(|e| CareerError::Storage(e.to_string()))?;

        conn.execute(
            "INSERT INTO history (id, user_id, kind, query, data, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)",
            params![
                id,
                item.user_id,
                item.kind.as_str(),
                item.query,
                data_json,
                timestamp
            ],
        )
        .context("Failed to insert history item")
        .map_err(|e| CareerError::Storage(e.to_string()))?;

        tracing::info!(id = %id, kind = %item.kind, "Added history item");
        Ok(id)
    }

    /// List a user's artifacts, newest first
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<HistoryItem>> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, kind, query, data, timestamp
                FROM history
                WHERE user_id = ?
                ORDER BY timestamp DESC, id DESC",
            )
            .context("Failed to prepare statement")
            .map_err(|e| CareerError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map(params![user_id], read_row)
            .context("Failed to query history")
            .map_err(|e| CareerError::Storage(e.to_string()))?;

        let mut items = Vec::new();
        for row in rows {
            match row.map_err(anyhow::Error::from).and_then(into_item) {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!("Skipping unreadable history row: {}", e),
            }
        }

        Ok(items)
    }

    /// Load a single artifact by id
    pub fn get(&self, id: &str) -> Result<Option<HistoryItem>> {
        let conn = self.open()?;

        let row = conn
            .query_row(
                "SELECT id, user_id, kind, query, data, timestamp FROM history WHERE id = ?",
                params![id],
                read_row,
            )
            .optional()
            .context("Failed to query history item")
            .map_err(|e| CareerError::Storage(e.to_string()))?;

        row.map(into_item).transpose()
    }

    /// Delete an artifact; deleting a missing id is not an error
    ///
    /// Returns whether a row was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.open()?;
        let removed = conn
            .execute("DELETE FROM history WHERE id = ?", params![id])
            .context("Failed to delete history item")
            .map_err(|e| CareerError::Storage(e.to_string()))?;

        tracing::info!(id = %id, removed, "Deleted history item");
        Ok(removed > 0)
    }
}

type RawRow = (String, String, String, String, String, i64);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn into_item(raw: RawRow) -> Result<HistoryItem> {
    let (id, user_id, kind, query, data_json, timestamp) = raw;
    let kind: HistoryKind = kind.parse()?;
    let data = serde_json::from_str(&data_json)
        .context("Failed to deserialize history data")
        .map_err(|e| CareerError::Storage(e.to_string()))?;

    Ok(HistoryItem {
        id,
        user_id,
        kind,
        query,
        data,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use std::env;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::tempdir;

    fn create_test_store() -> (SqliteHistoryStore, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let store = SqliteHistoryStore::new_with_path(dir.path().join("history.db"))
            .expect("failed to create store");
        (store, dir)
    }

    fn roadmap_item(user: &str, query: &str) -> NewHistoryItem {
        NewHistoryItem {
            user_id: user.to_string(),
            kind: HistoryKind::Roadmap,
            query: query.to_string(),
            data: json!({"steps": [{"title": "Learn", "description": "d", "resources": []}]}),
        }
    }

    #[test]
    fn test_init_creates_table() {
        let (store, _dir) = create_test_store();
        let conn = Connection::open(&store.db_path).expect("open connection");
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='history'",
                [],
                |r| r.get(0),
            )
            .expect("query row");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_add_then_get_roundtrips_data() {
        let (store, _dir) = create_test_store();
        let id = store.add(roadmap_item("u1", "Data Engineer")).unwrap();

        let item = store.get(&id).unwrap().expect("item present");
        assert_eq!(item.user_id, "u1");
        assert_eq!(item.kind, HistoryKind::Roadmap);
        assert_eq!(item.query, "Data Engineer");
        assert_eq!(item.data["steps"][0]["title"], "Learn");
    }

    #[test]
    fn test_list_is_newest_first_and_scoped_to_user() {
        let (store, _dir) = create_test_store();
        let first = store.add(roadmap_item("u1", "first")).unwrap();
        sleep(Duration::from_millis(5));
        let second = store.add(roadmap_item("u1", "second")).unwrap();
        store.add(roadmap_item("u2", "other")).unwrap();

        let items = store.list_for_user("u1").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, second);
        assert_eq!(items[1].id, first);
    }

    #[test]
    fn test_add_rejects_empty_user() {
        let (store, _dir) = create_test_store();
        assert!(store.add(roadmap_item("  ", "q")).is_err());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (store, _dir) = create_test_store();
        let id = store.add(roadmap_item("u1", "q")).unwrap();

        assert!(store.delete(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
        assert!(store.get(&id).unwrap().is_none());
    }

    #[test]
    #[serial]
    fn test_new_respects_env_override() {
        let dir = tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("nested").join("history.db");
        env::set_var("CAREERCHAT_HISTORY_DB", db_path.to_string_lossy().to_string());

        let store = SqliteHistoryStore::new().expect("new failed with env override");
        assert_eq!(store.db_path, db_path);
        assert!(db_path.parent().unwrap().exists());

        env::remove_var("CAREERCHAT_HISTORY_DB");
    }
}
