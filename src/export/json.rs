//! JSON import/export for decks.
//! A deck exports together with each card's scheduling state, so a deck
//! moved between machines keeps its review history.

use crate::models::Deck;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid deck file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exports a deck to a JSON file at the specified path.
pub fn export_json_to_path(deck: &Deck, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(deck)?;
    fs::write(path, json)?;
    Ok(())
}

/// Imports a deck from a JSON file.
///
/// Cards missing scheduling fields get the defaults, so decks written by
/// other tools with only front/back text import cleanly as fresh cards.
pub fn import_json(path: &Path) -> Result<Deck, ExportError> {
    let contents = fs::read_to_string(path)?;
    let deck: Deck = serde_json::from_str(&contents)?;
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Card;
    use chrono::{TimeZone, Utc};
    use std::env;
    use std::path::PathBuf;

    fn test_deck() -> Deck {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Deck {
            name: "Test Deck".to_string(),
            cards: vec![
                Card::new(1, "hello", "hola", now),
                Card::new(2, "goodbye", "adiós", now),
            ],
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_export_and_import_keep_scheduling_state() {
        let mut deck = test_deck();
        deck.cards[0].interval_days = 12;
        deck.cards[0].ease_factor = 2.8;
        let path = temp_path("cardbox_roundtrip.json");

        export_json_to_path(&deck, &path).unwrap();
        let imported = import_json(&path).unwrap();

        assert_eq!(imported.name, deck.name);
        assert_eq!(imported.cards.len(), deck.cards.len());
        assert_eq!(imported.cards[0].interval_days, 12);
        assert_eq!(imported.cards[0].ease_factor, 2.8);
        assert_eq!(imported.cards[0].due_at, deck.cards[0].due_at);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_import_of_minimal_deck_yields_fresh_cards() {
        let json = r#"{
  "name": "Minimal",
  "cards": [
    {
      "front": "question",
      "back": "answer"
    }
  ]
}"#;
        let path = temp_path("cardbox_minimal.json");
        fs::write(&path, json).unwrap();

        let deck = import_json(&path).unwrap();
        assert_eq!(deck.name, "Minimal");
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.cards[0].interval_days, 1);
        assert_eq!(deck.cards[0].ease_factor, 2.5);
        // Empty due time reads as due immediately.
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert!(deck.cards[0].is_due(now));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_import_nonexistent_file_fails() {
        let result = import_json(Path::new("cardbox_nonexistent_xyz123.json"));
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn test_import_invalid_json_fails() {
        let path = temp_path("cardbox_invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        let result = import_json(&path);
        assert!(matches!(result, Err(ExportError::Json(_))));

        let _ = fs::remove_file(&path);
    }
}
