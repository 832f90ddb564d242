//! Event selection by category, date range, and free text.

use crate::date_range::DateRange;
use crate::event::Event;

/// Filter criteria. All given criteria must match (AND); omitted ones
/// match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Category to match (case-insensitive, surrounding whitespace ignored).
    pub category: Option<String>,
    /// Inclusive date bounds.
    pub range: DateRange,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn between(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.matches_category(event) && self.range.contains(event.date)
    }

    fn matches_category(&self, event: &Event) -> bool {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(wanted) => event.category.trim().to_lowercase() == wanted.to_lowercase(),
        }
    }
}

/// Case-insensitive text query over title and description.
#[derive(Debug, Clone)]
pub struct TextQuery {
    needle: String,
}

impl TextQuery {
    pub fn new(query: &str) -> Self {
        TextQuery {
            needle: query.trim().to_lowercase(),
        }
    }

    /// A blank query matches every event.
    pub fn matches(&self, event: &Event) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        event.title.to_lowercase().contains(&self.needle)
            || event
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&self.needle))
    }
}
