//! Container for all available decks
use super::Deck;

#[derive(Clone)]
pub struct DeckSet {
    pub decks: Vec<Deck>,
}

impl Default for DeckSet {
    fn default() -> Self {
        Self { decks: Vec::new() }
    }
}

impl DeckSet {
    pub fn deck(&self, name: &str) -> Option<&Deck> {
        self.decks.iter().find(|deck| deck.name == name)
    }

    pub fn deck_mut(&mut self, name: &str) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|deck| deck.name == name)
    }
}
