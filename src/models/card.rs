//! A flashcard with its scheduling state.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{due_date, scheduler};

fn default_interval() -> i64 {
    scheduler::INITIAL_INTERVAL_DAYS
}

fn default_ease() -> f64 {
    scheduler::INITIAL_EASE_FACTOR
}

/// A single front/back card plus the state the scheduler maintains for it.
///
/// Cards deserialized from deck files may omit the scheduling fields; the
/// defaults make such a card fresh and due immediately.
#[derive(Clone, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
    /// RFC 3339 timestamp of the next review. Unreadable values are
    /// repaired to "due now" when the card enters a review queue.
    #[serde(default)]
    pub due_at: String,
    #[serde(default = "default_interval")]
    pub interval_days: i64,
    #[serde(default = "default_ease")]
    pub ease_factor: f64,
}

impl Card {
    /// Creates a fresh card that is due immediately.
    pub fn new(id: i64, front: &str, back: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            front: front.to_string(),
            back: back.to_string(),
            due_at: due_date::format(now),
            interval_days: scheduler::INITIAL_INTERVAL_DAYS,
            ease_factor: scheduler::INITIAL_EASE_FACTOR,
        }
    }

    pub fn due_time(&self) -> Option<DateTime<Utc>> {
        due_date::parse(&self.due_at)
    }

    /// Whether the card is eligible for review at `now`. A card with an
    /// unreadable due time counts as due, same as the review queue treats it.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.due_time() {
            Some(due) => due <= now,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_new_card_is_due_immediately() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let card = Card::new(1, "front", "back", now);

        assert!(card.is_due(now));
        assert_eq!(card.interval_days, 1);
        assert_eq!(card.ease_factor, 2.5);
    }

    #[test]
    fn test_missing_scheduling_fields_deserialize_to_defaults() {
        let card: Card = serde_json::from_str(r#"{"front": "hello", "back": "world"}"#).unwrap();

        assert_eq!(card.front, "hello");
        assert_eq!(card.back, "world");
        assert_eq!(card.interval_days, 1);
        assert_eq!(card.ease_factor, 2.5);
        assert!(card.due_at.is_empty());
    }

    #[test]
    fn test_unreadable_due_time_counts_as_due() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut card = Card::new(1, "front", "back", now);
        card.due_at = "garbage".to_string();

        assert!(card.is_due(now));
    }

    #[test]
    fn test_future_card_is_not_due() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut card = Card::new(1, "front", "back", now);
        card.due_at = due_date::format(now + Duration::days(3));

        assert!(!card.is_due(now));
        assert!(card.is_due(now + Duration::days(3)));
    }
}
