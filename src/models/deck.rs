//! Deck is a named set of cards
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Card;

/// The deck that always exists and cannot be deleted.
pub const DEFAULT_DECK_NAME: &str = "Default";

#[derive(Clone, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            name: DEFAULT_DECK_NAME.to_string(),
            cards: Vec::new(),
        }
    }
}

impl Deck {
    pub fn card(&self, id: i64) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn card_mut(&mut self, id: i64) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    /// Number of cards eligible for review at `now`.
    pub fn due_count(&self, now: DateTime<Utc>) -> usize {
        self.cards.iter().filter(|card| card.is_due(now)).count()
    }
}
