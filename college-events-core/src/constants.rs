/// Days ahead of today covered by the upcoming-events window.
pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

/// Date format used on disk and for parsing caller input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format used for display ("March 15, 2024").
pub const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// Number of recommendations returned when the caller gives no limit.
pub const DEFAULT_RECOMMEND_LIMIT: usize = 5;
