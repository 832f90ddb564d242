//! Event records as stored in the events file.
//!
//! `Event` is the persisted shape. `NewEvent` carries raw caller input
//! (form values, strings) and is validated before it touches the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DATE_FORMAT;
use crate::date_range::parse_date;
use crate::error::{EventsError, EventsResult};

/// Identifier assigned by the store on creation. Never reused while the
/// event holding it exists.
pub type EventId = u64;

/// A college event (workshop, seminar, hackathon, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Registration or info link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Event {
    /// Human-readable date, e.g. "March 15, 2024".
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// Unvalidated input for creating or replacing an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub category: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl NewEvent {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        NewEvent {
            title: title.into(),
            category: category.into(),
            date: date.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Check field constraints and normalize whitespace.
    ///
    /// Title must be non-empty and date must be a real `YYYY-MM-DD` calendar
    /// date. Blank optional fields become `None`.
    pub(crate) fn validate(self) -> EventsResult<ValidEvent> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(EventsError::Validation("title must not be empty".into()));
        }

        let date = parse_date(&self.date)?;

        Ok(ValidEvent {
            title,
            category: self.category.trim().to_string(),
            date,
            description: non_blank(self.description),
            location: non_blank(self.location),
            url: non_blank(self.url),
        })
    }
}

/// Field values that passed validation, waiting for an id.
#[derive(Debug, Clone)]
pub(crate) struct ValidEvent {
    title: String,
    category: String,
    date: NaiveDate,
    description: Option<String>,
    location: Option<String>,
    url: Option<String>,
}

impl ValidEvent {
    pub(crate) fn with_id(self, id: EventId) -> Event {
        Event {
            id,
            title: self.title,
            category: self.category,
            date: self.date,
            description: self.description,
            location: self.location,
            url: self.url,
        }
    }

    /// Overwrite every field except the id.
    pub(crate) fn apply_to(self, event: &mut Event) {
        *event = self.with_id(event.id);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_trims_and_drops_blank_optionals() {
        let event = NewEvent::new("  AI Workshop ", " Workshop ", "2024-03-15")
            .with_description("   ")
            .with_location("Hall A")
            .validate()
            .unwrap()
            .with_id(1);

        assert_eq!(event.title, "AI Workshop");
        assert_eq!(event.category, "Workshop");
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(event.description, None);
        assert_eq!(event.location.as_deref(), Some("Hall A"));
        assert_eq!(event.url, None);
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let err = NewEvent::new("   ", "Seminar", "2024-04-01")
            .validate()
            .unwrap_err();
        assert!(matches!(err, EventsError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_impossible_date() {
        for bad in ["2024-02-30", "15/03/2024", "", "tomorrow"] {
            let err = NewEvent::new("Hackathon", "Hackathon", bad)
                .validate()
                .unwrap_err();
            assert!(matches!(err, EventsError::Validation(_)), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_apply_to_keeps_id() {
        let mut event = NewEvent::new("Old", "Seminar", "2024-01-01")
            .validate()
            .unwrap()
            .with_id(7);

        NewEvent::new("New", "Workshop", "2024-02-02")
            .validate()
            .unwrap()
            .apply_to(&mut event);

        assert_eq!(event.id, 7);
        assert_eq!(event.title, "New");
        assert_eq!(event.category, "Workshop");
    }

    #[test]
    fn test_display_date() {
        let event = NewEvent::new("AI Workshop", "Workshop", "2024-03-05")
            .validate()
            .unwrap()
            .with_id(1);
        assert_eq!(event.display_date(), "March 05, 2024");
    }

    #[test]
    fn test_json_shape() {
        let event = NewEvent::new("AI Workshop", "Workshop", "2024-03-15")
            .with_location("Hall A")
            .validate()
            .unwrap()
            .with_id(1);

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "id": 1,
                "title": "AI Workshop",
                "category": "Workshop",
                "date": "2024-03-15",
                "description": null,
                "location": "Hall A"
            })
        );
    }

    #[test]
    fn test_deserialize_tolerates_missing_optionals() {
        let event: Event = serde_json::from_value(json!({
            "id": 3,
            "title": "ML Seminar",
            "date": "2024-04-01"
        }))
        .unwrap();

        assert_eq!(event.category, "");
        assert_eq!(event.description, None);
        assert_eq!(event.location, None);
    }
}
