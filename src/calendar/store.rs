use thiserror::Error;
use uuid::Uuid;

use crate::calendar::{DateKey, Event, NewEvent};
use crate::storage::repository::{RepositoryError, Snapshot, SnapshotRepository};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No event with id '{id}' on {date}")]
    NotFound { date: DateKey, id: String },
    #[error("Failed to persist events: {0}")]
    Repository(#[from] RepositoryError),
}

/// Per-date event lists mirrored to a snapshot repository after every mutation.
pub struct EventStore<R> {
    events: Snapshot,
    repository: R,
}

impl<R: SnapshotRepository> EventStore<R> {
    /// Reads the persisted snapshot, starting empty if it is missing or unreadable.
    pub fn load(repository: R) -> Self {
        let events = match repository.load() {
            Ok(Some(snapshot)) => {
                tracing::info!("Loaded events for {} dates", snapshot.len());
                snapshot
            }
            Ok(None) => {
                tracing::info!("No stored events found, starting empty");
                Snapshot::new()
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable event snapshot: {}", e);
                Snapshot::new()
            }
        };

        Self { events, repository }
    }

    pub fn events_on(&self, date: DateKey) -> &[Event] {
        self.events.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn event_count(&self, date: DateKey) -> usize {
        self.events_on(date).len()
    }

    pub fn find(&self, date: DateKey, id: &str) -> Option<&Event> {
        self.events_on(date).iter().find(|e| e.id == id)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.events
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Appends without validation; run the overlap check first.
    pub fn add_event(&mut self, date: DateKey, new_event: NewEvent) -> Result<Event, StoreError> {
        let event = new_event.with_id(Uuid::new_v4().to_string());
        self.events.entry(date).or_default().push(event.clone());
        tracing::debug!("Added event {} on {}", event.id, date);

        self.persist()?;
        Ok(event)
    }

    pub fn edit_event(&mut self, date: DateKey, updated: Event) -> Result<(), StoreError> {
        let slot = self
            .events
            .get_mut(&date)
            .and_then(|list| list.iter_mut().find(|e| e.id == updated.id));

        let Some(slot) = slot else {
            return Err(StoreError::NotFound { date, id: updated.id });
        };

        tracing::debug!("Edited event {} on {}", updated.id, date);
        *slot = updated;
        self.persist()
    }

    /// Removes and returns the event. The date keeps an empty list once its last event is gone.
    pub fn delete_event(&mut self, date: DateKey, id: &str) -> Result<Event, StoreError> {
        let position = self
            .events
            .get(&date)
            .and_then(|list| list.iter().position(|e| e.id == id));

        let (Some(index), Some(list)) = (position, self.events.get_mut(&date)) else {
            return Err(StoreError::NotFound { date, id: id.to_string() });
        };

        let removed = list.remove(index);
        tracing::debug!("Deleted event {} on {}", removed.id, date);
        self.persist()?;
        Ok(removed)
    }

    pub fn persist(&mut self) -> Result<(), StoreError> {
        if self.events.is_empty() {
            tracing::debug!("Skipping save of empty event map");
            return Ok(());
        }

        self.repository.save(&self.events)?;
        Ok(())
    }
}
