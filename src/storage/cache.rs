use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};

use crate::storage::repository::{decode_snapshot, RepositoryError, Snapshot, SnapshotRepository, SNAPSHOT_KEY};

/// SQLite-backed key-value table holding the serialized snapshot.
pub struct Cache {
    conn: Connection,
}

impl Cache {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: &std::path::Path) -> Result<Self, RepositoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let cache = Self::new(Connection::open(path)?);
        cache.initialize()?;
        Ok(cache)
    }

    pub fn initialize(&self) -> Result<(), RepositoryError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    pub fn table_exists(&self, table_name: &str) -> bool {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        );
        result.unwrap_or(0) > 0
    }
}

impl SnapshotRepository for Cache {
    fn load(&self) -> Result<Option<Snapshot>, RepositoryError> {
        match self.get(SNAPSHOT_KEY)? {
            Some(data) => Ok(Some(decode_snapshot(&data)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), RepositoryError> {
        let data = serde_json::to_string(snapshot)?;
        self.set(SNAPSHOT_KEY, &data)
    }
}
