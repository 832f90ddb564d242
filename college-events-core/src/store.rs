//! JSON-file backed event store.
//!
//! The whole collection lives in one JSON array. Reads load and parse the
//! full file; every mutation is a read-modify-write of the full file under
//! an exclusive advisory lock, so cooperating writers never lose updates.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::config::EventsConfig;
use crate::constants::{DEFAULT_RECOMMEND_LIMIT, DEFAULT_UPCOMING_DAYS};
use crate::date_range::DateRange;
use crate::error::{EventsError, EventsResult};
use crate::event::{Event, EventId, NewEvent};
use crate::filter::{EventFilter, TextQuery};
use crate::lock;
use crate::recommend::Recommender;

#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
    lock_path: PathBuf,
    upcoming_days: u32,
    recommend_limit: usize,
}

impl EventStore {
    /// Store backed by `path`. Nothing is touched until the first operation;
    /// a missing file reads as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        EventStore {
            lock_path: lock::lock_path_for(&path),
            path,
            upcoming_days: DEFAULT_UPCOMING_DAYS,
            recommend_limit: DEFAULT_RECOMMEND_LIMIT,
        }
    }

    pub fn from_config(config: &EventsConfig) -> Self {
        Self::open(config.event_file_path())
            .with_upcoming_days(config.upcoming_days)
            .with_recommend_limit(config.recommend_limit)
    }

    pub fn with_upcoming_days(mut self, days: u32) -> Self {
        self.upcoming_days = days;
        self
    }

    pub fn with_recommend_limit(mut self, limit: usize) -> Self {
        self.recommend_limit = limit;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // QUERIES:

    /// All events in insertion order.
    pub fn list_all(&self) -> EventsResult<Vec<Event>> {
        self.load()
    }

    pub fn get(&self, id: EventId) -> EventsResult<Event> {
        self.load()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(EventsError::NotFound(id))
    }

    /// Events whose title or description contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> EventsResult<Vec<Event>> {
        let query = TextQuery::new(query);
        Ok(self.load()?.into_iter().filter(|e| query.matches(e)).collect())
    }

    pub fn filter(&self, filter: &EventFilter) -> EventsResult<Vec<Event>> {
        Ok(self.load()?.into_iter().filter(|e| filter.matches(e)).collect())
    }

    /// Events from `today` through the configured number of days ahead.
    pub fn upcoming(&self, today: NaiveDate) -> EventsResult<Vec<Event>> {
        let filter = EventFilter::new().between(DateRange::upcoming(today, self.upcoming_days));
        self.filter(&filter)
    }

    pub fn upcoming_from_now(&self) -> EventsResult<Vec<Event>> {
        self.upcoming(Local::now().date_naive())
    }

    /// Up to `top_n` events most similar to `interest`, best first.
    pub fn recommend(&self, interest: &str, top_n: usize) -> EventsResult<Vec<Event>> {
        let events = self.load()?;
        let model = Recommender::fit(&events);

        Ok(model
            .recommend(&events, interest, top_n)
            .into_iter()
            .cloned()
            .collect())
    }

    /// `recommend` with the configured limit.
    pub fn recommend_default(&self, interest: &str) -> EventsResult<Vec<Event>> {
        self.recommend(interest, self.recommend_limit)
    }

    // MUTATIONS:

    /// Validate and append a new event with id = max existing id + 1.
    pub fn add(&self, new: NewEvent) -> EventsResult<Event> {
        let valid = new.validate()?;

        let event = self.modify(|events| {
            let id = events
                .iter()
                .map(|e| e.id)
                .max()
                .unwrap_or(0)
                .checked_add(1)
                .ok_or_else(|| self.corrupt("event id space exhausted".into()))?;
            let event = valid.with_id(id);
            events.push(event.clone());
            Ok(event)
        })?;

        info!(id = event.id, title = %event.title, "added event");
        Ok(event)
    }

    /// Replace every field of event `id` except the id itself.
    /// The event keeps its position in the listing.
    pub fn update(&self, id: EventId, new: NewEvent) -> EventsResult<Event> {
        let valid = new.validate()?;

        let event = self.modify(|events| {
            let event = events
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or(EventsError::NotFound(id))?;
            valid.apply_to(event);
            Ok(event.clone())
        })?;

        info!(id = event.id, title = %event.title, "updated event");
        Ok(event)
    }

    /// Remove event `id` and return it. An unknown id is `NotFound` and
    /// leaves the file untouched.
    pub fn delete(&self, id: EventId) -> EventsResult<Event> {
        let removed = self.modify(|events| {
            let pos = events
                .iter()
                .position(|e| e.id == id)
                .ok_or(EventsError::NotFound(id))?;
            Ok(events.remove(pos))
        })?;

        info!(id = removed.id, title = %removed.title, "deleted event");
        Ok(removed)
    }

    // PERSISTENCE:

    /// Hold the write lock across load, change and save. If `change` fails
    /// nothing is written.
    fn modify<T>(
        &self,
        change: impl FnOnce(&mut Vec<Event>) -> EventsResult<T>,
    ) -> EventsResult<T> {
        let _lock = lock::acquire(&self.lock_path)?;

        let mut events = self.load()?;
        let result = change(&mut events)?;
        self.save(&events)?;

        Ok(result)
    }

    fn load(&self) -> EventsResult<Vec<Event>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let events: Vec<Event> =
            serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))?;

        let mut seen = HashSet::new();
        if let Some(dup) = events.iter().find(|e| !seen.insert(e.id)) {
            return Err(self.corrupt(format!("duplicate event id {}", dup.id)));
        }

        debug!(path = %self.path.display(), count = events.len(), "loaded events");
        Ok(events)
    }

    fn save(&self, events: &[Event]) -> EventsResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut content = serde_json::to_string_pretty(events).map_err(std::io::Error::other)?;
        content.push('\n');
        std::fs::write(&self.path, content)?;

        debug!(path = %self.path.display(), count = events.len(), "saved events");
        Ok(())
    }

    fn corrupt(&self, reason: String) -> EventsError {
        warn!(path = %self.path.display(), %reason, "event store is corrupt");
        EventsError::CorruptStore {
            path: self.path.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, EventStore) {
        let dir = TempDir::new().unwrap();
        let store = EventStore::open(dir.path().join("events.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_and_empty_file_read_as_empty() {
        let (_dir, store) = store();
        assert!(store.list_all().unwrap().is_empty());

        std::fs::write(store.path(), "  \n").unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_ids_continue_from_max() {
        let (_dir, store) = store();
        std::fs::write(
            store.path(),
            r#"[{"id": 9, "title": "Old", "category": "Seminar", "date": "2023-01-01",
                 "description": null, "location": null}]"#,
        )
        .unwrap();

        let event = store
            .add(NewEvent::new("New", "Seminar", "2024-01-01"))
            .unwrap();
        assert_eq!(event.id, 10);
    }

    #[test]
    fn test_add_fails_when_ids_exhausted() {
        let (_dir, store) = store();
        let content = format!(
            r#"[{{"id": {}, "title": "Last", "category": "Seminar", "date": "2024-01-01"}}]"#,
            u64::MAX
        );
        std::fs::write(store.path(), &content).unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);

        let err = store
            .add(NewEvent::new("Next", "Seminar", "2024-01-02"))
            .unwrap_err();
        assert!(matches!(err, EventsError::CorruptStore { .. }));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), content);
    }

    #[test]
    fn test_duplicate_ids_are_corrupt() {
        let (_dir, store) = store();
        std::fs::write(
            store.path(),
            r#"[{"id": 1, "title": "A", "date": "2024-01-01"},
                {"id": 1, "title": "B", "date": "2024-01-02"}]"#,
        )
        .unwrap();

        assert!(matches!(
            store.list_all().unwrap_err(),
            EventsError::CorruptStore { .. }
        ));
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let (_dir, store) = store();
        std::fs::write(store.path(), r#"{"events": []}"#).unwrap();

        assert!(matches!(
            store.list_all().unwrap_err(),
            EventsError::CorruptStore { .. }
        ));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = EventStore::open(dir.path().join("a/b/events.json"));
        store
            .add(NewEvent::new("AI Workshop", "Workshop", "2024-03-15"))
            .unwrap();
        assert!(store.path().exists());
    }
}
