pub mod cache;
pub mod config;
pub mod repository;

use cache::Cache;
use config::{StorageBackend, StorageConfig};
use repository::{JsonFileRepository, MemoryRepository, RepositoryError, SnapshotRepository};

pub fn open_repository(config: &StorageConfig) -> Result<Box<dyn SnapshotRepository>, RepositoryError> {
    let repository: Box<dyn SnapshotRepository> = match config.backend {
        StorageBackend::Sqlite => Box::new(Cache::open(&config.path)?),
        StorageBackend::Json => Box::new(JsonFileRepository::new(&config.path)),
        StorageBackend::Memory => Box::new(MemoryRepository::new()),
    };
    tracing::info!("Using {:?} storage", config.backend);
    Ok(repository)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::store::EventStore;
    use crate::calendar::{DateKey, EventColor, NewEvent};
    use tempfile::TempDir;

    fn standup() -> NewEvent {
        NewEvent {
            title: "Standup".to_string(),
            description: None,
            color: EventColor::Blue,
            start_time: "09:00".parse().unwrap(),
            end_time: "09:30".parse().unwrap(),
        }
    }

    fn reopen_keeps_events(backend: StorageBackend, file_name: &str) {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            backend,
            path: dir.path().join(file_name),
        };
        let day = DateKey::from_ymd(2024, 6, 15).unwrap();

        let mut store = EventStore::load(open_repository(&config).unwrap());
        let event = store.add_event(day, standup()).unwrap();
        drop(store);

        let reopened = EventStore::load(open_repository(&config).unwrap());
        assert_eq!(reopened.events_on(day), &[event]);
    }

    #[test]
    fn sqlite_backend_persists_between_opens() {
        reopen_keeps_events(StorageBackend::Sqlite, "events.db");
    }

    #[test]
    fn json_backend_persists_between_opens() {
        reopen_keeps_events(StorageBackend::Json, "events.json");
    }

    #[test]
    fn memory_backend_starts_empty() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            path: "unused".into(),
        };

        let store = EventStore::load(open_repository(&config).unwrap());

        assert!(store.snapshot().is_empty());
    }
}
