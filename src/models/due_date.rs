//! Parsing and formatting of card due times.
//!
//! Due times travel as RFC 3339 strings so deck files stay readable and
//! hand-editable. An unreadable value is data, not an error: callers repair
//! it to "due now" and move on.

use chrono::{DateTime, Utc};

/// Formats a due time for storage.
pub fn format(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Parses a stored due time, if readable.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

/// Checks a stored due time against `now`.
///
/// Returns the parsed time, or `now` together with a repair flag when the
/// value is unreadable. The caller decides whether to write the repaired
/// value back.
pub fn validate(raw: &str, now: DateTime<Utc>) -> (DateTime<Utc>, bool) {
    match parse(raw) {
        Some(time) => (time, false),
        None => (now, true),
    }
}
