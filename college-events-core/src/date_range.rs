//! Date range for filtering events.

use chrono::{Days, NaiveDate};

use crate::constants::DATE_FORMAT;
use crate::error::{EventsError, EventsResult};

/// Inclusive date range. None values mean unbounded in that direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        DateRange { from, to }
    }

    /// Parse optional YYYY-MM-DD bounds. Blank strings count as unbounded,
    /// so empty form fields can be passed straight through.
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> EventsResult<Self> {
        Ok(DateRange {
            from: parse_bound(from)?,
            to: parse_bound(to)?,
        })
    }

    /// `today` through `today + days`, both inclusive.
    pub fn upcoming(today: NaiveDate, days: u32) -> Self {
        DateRange {
            from: Some(today),
            to: today.checked_add_days(Days::new(u64::from(days))),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Parse a YYYY-MM-DD date.
/// Month and day must be zero-padded.
pub fn parse_date(s: &str) -> EventsResult<NaiveDate> {
    let invalid = || {
        EventsError::Validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
    };

    let trimmed = s.trim();
    if trimmed.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

fn parse_bound(s: Option<&str>) -> EventsResult<Option<NaiveDate>> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some),
    }
}
