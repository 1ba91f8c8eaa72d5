use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::calendar::{DateKey, Event};

/// Full date -> events mapping as it is persisted.
pub type Snapshot = BTreeMap<DateKey, Vec<Event>>;

/// Key the snapshot is stored under in key-value backends.
pub const SNAPSHOT_KEY: &str = "events";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Parses a stored snapshot. Keys naming the same day (`6/15/2024` next to
/// `2024-06-15`) are merged in key order; an id already on that day is kept once.
pub fn decode_snapshot(raw: &str) -> Result<Snapshot, RepositoryError> {
    let by_key: BTreeMap<String, Vec<Event>> = serde_json::from_str(raw)?;
    let mut snapshot = Snapshot::new();

    for (key, events) in by_key {
        let date: DateKey = key
            .parse()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;

        match snapshot.get_mut(&date) {
            Some(existing) => {
                tracing::warn!("Merging events stored under '{}' into {}", key, date);
                for event in events {
                    if existing.iter().all(|e| e.id != event.id) {
                        existing.push(event);
                    }
                }
            }
            None => {
                snapshot.insert(date, events);
            }
        }
    }

    Ok(snapshot)
}

/// Storage medium for the event store's snapshot.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotRepository {
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>, RepositoryError>;
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), RepositoryError>;
}

impl<R: SnapshotRepository + ?Sized> SnapshotRepository for Box<R> {
    fn load(&self) -> Result<Option<Snapshot>, RepositoryError> {
        (**self).load()
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), RepositoryError> {
        (**self).save(snapshot)
    }
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    stored: Option<String>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { stored: Some(raw.into()) }
    }

    pub fn raw(&self) -> Option<&str> {
        self.stored.as_deref()
    }
}

impl SnapshotRepository for MemoryRepository {
    fn load(&self) -> Result<Option<Snapshot>, RepositoryError> {
        match self.stored.as_deref() {
            Some(raw) => Ok(Some(decode_snapshot(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), RepositoryError> {
        self.stored = Some(serde_json::to_string(snapshot)?);
        Ok(())
    }
}

/// Snapshot kept as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<Snapshot>, RepositoryError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(decode_snapshot(&content)?))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EventColor;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            DateKey::from_ymd(2024, 6, 15).unwrap(),
            vec![Event {
                id: "evt-1".to_string(),
                title: "Standup".to_string(),
                description: Some("Daily".to_string()),
                color: EventColor::Blue,
                start_time: "09:00".parse().unwrap(),
                end_time: "09:30".parse().unwrap(),
            }],
        );
        snapshot
    }

    #[test]
    fn memory_repository_starts_empty() {
        let repo = MemoryRepository::new();

        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn memory_repository_returns_saved_snapshot() {
        let mut repo = MemoryRepository::new();
        let snapshot = sample_snapshot();

        repo.save(&snapshot).unwrap();

        assert_eq!(repo.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn snapshot_is_keyed_by_iso_date() {
        let mut repo = MemoryRepository::new();

        repo.save(&sample_snapshot()).unwrap();

        assert!(repo.raw().unwrap().starts_with(r#"{"2024-06-15":["#));
    }

    #[test]
    fn legacy_locale_keys_are_accepted() {
        let repo = MemoryRepository::with_raw(
            r#"{"6/15/2024":[{"id":"1718440000000","title":"Standup","color":"bg-blue-500","startTime":"09:00","endTime":"09:30"}]}"#,
        );

        let snapshot = repo.load().unwrap().unwrap();

        let key = DateKey::from_ymd(2024, 6, 15).unwrap();
        assert_eq!(snapshot[&key][0].color, EventColor::Blue);
    }

    #[test]
    fn legacy_and_iso_keys_for_one_day_are_merged() {
        let repo = MemoryRepository::with_raw(
            r#"{
                "6/15/2024":[
                    {"id":"old","title":"Standup","color":"bg-blue-500","startTime":"09:00","endTime":"09:30"},
                    {"id":"both","title":"Review","color":"green","startTime":"14:00","endTime":"15:00"}
                ],
                "2024-06-15":[
                    {"id":"both","title":"Review","color":"green","startTime":"14:00","endTime":"15:00"},
                    {"id":"new","title":"Lunch","color":"red","startTime":"12:00","endTime":"13:00"}
                ]
            }"#,
        );

        let snapshot = repo.load().unwrap().unwrap();

        let key = DateKey::from_ymd(2024, 6, 15).unwrap();
        let ids: Vec<&str> = snapshot[&key].iter().map(|e| e.id.as_str()).collect();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(ids, vec!["both", "new", "old"]);
    }

    #[test]
    fn unparseable_date_key_is_an_error() {
        let repo = MemoryRepository::with_raw(r#"{"someday":[]}"#);

        assert!(matches!(repo.load(), Err(RepositoryError::Serialization(_))));
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let repo = MemoryRepository::with_raw("{not json");

        assert!(matches!(repo.load(), Err(RepositoryError::Serialization(_))));
    }

    #[test]
    fn json_file_missing_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("events.json"));

        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn json_file_round_trips_and_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let mut repo = JsonFileRepository::new(dir.path().join("nested").join("events.json"));
        let snapshot = sample_snapshot();

        repo.save(&snapshot).unwrap();

        assert!(repo.path().exists());
        assert_eq!(repo.load().unwrap(), Some(snapshot));
    }
}
