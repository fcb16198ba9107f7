//! Review queue for a study session.
//!
//! The queue never copies cards. It holds card ids in a shuffled order and
//! resolves them against the owning deck on demand, so scheduler updates
//! stay visible to the deck, the store, and the queue alike. Removal is by
//! identity rather than position, which keeps it safe to rate and remove a
//! card even after the queue has been rebuilt underneath the caller.

use chrono::{DateTime, Utc};
use log::warn;
use rand::Rng;
use rand::seq::SliceRandom;

use super::{Card, Deck, due_date};

#[derive(Clone, Debug, Default)]
pub struct ReviewQueue {
    card_ids: Vec<i64>,
}

impl ReviewQueue {
    /// Builds a queue from the deck's currently due cards, in random order.
    ///
    /// A card whose due time cannot be read is treated as due immediately
    /// and its stored value is repaired to `now`.
    pub fn load_eligible<R: Rng + ?Sized>(
        deck: &mut Deck,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let mut card_ids = Vec::new();
        for card in &mut deck.cards {
            let (due, repaired) = due_date::validate(&card.due_at, now);
            if repaired {
                warn!("card {} has an unreadable due time, treating it as due now", card.id);
                card.due_at = due_date::format(now);
            }
            if due <= now {
                card_ids.push(card.id);
            }
        }
        card_ids.shuffle(rng);
        Self { card_ids }
    }

    /// Builds a queue over every card in the deck, ignoring due times.
    /// Used for forced full-deck sessions.
    pub fn load_all<R: Rng + ?Sized>(deck: &Deck, rng: &mut R) -> Self {
        let mut card_ids: Vec<i64> = deck.cards.iter().map(|card| card.id).collect();
        card_ids.shuffle(rng);
        Self { card_ids }
    }

    /// The id of the next card to review, without removing it.
    pub fn peek_head(&self) -> Option<i64> {
        self.card_ids.first().copied()
    }

    /// Resolves the head card against its deck.
    pub fn head_card<'a>(&self, deck: &'a Deck) -> Option<&'a Card> {
        self.peek_head().and_then(|id| deck.card(id))
    }

    /// Drops a card from the queue wherever it sits. No-op when absent.
    pub fn remove_by_id(&mut self, id: i64) {
        if let Some(position) = self.card_ids.iter().position(|&card_id| card_id == id) {
            self.card_ids.remove(position);
        }
    }

    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }
}
