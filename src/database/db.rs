//! Database operations for the flashcard application
//!
//! Handles SQLite initialization, CRUD operations for decks and cards, and
//! the review log. The scheduler and review queue never touch the database
//! themselves: the application loads cards from here, mutates them in
//! memory, and writes the result back through [`update_card`].

use crate::models::deck::DEFAULT_DECK_NAME;
use crate::models::{Card, Deck, DeckSet, Rating, due_date};
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{Connection, Result, params};

/// Opens the application database and creates any missing tables.
///
/// The `Default` deck is created on first run and survives every later
/// delete attempt.
pub fn init_database() -> Result<Connection> {
    let conn = Connection::open("cardbox.sqlite3")?;
    create_tables(&conn)?;
    ensure_default_deck(&conn)?;
    Ok(conn)
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS decks (
            name TEXT PRIMARY KEY
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_name TEXT NOT NULL,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            due_at TEXT NOT NULL,
            interval_days INTEGER NOT NULL DEFAULT 1,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            FOREIGN KEY (deck_name) REFERENCES decks(name)
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reviewed_at TEXT NOT NULL,
            card_id INTEGER NOT NULL,
            deck_name TEXT NOT NULL,
            quality INTEGER NOT NULL,
            new_interval_days INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Creates the `Default` deck if it is missing.
pub fn ensure_default_deck(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO decks (name) VALUES (?1)",
        params![DEFAULT_DECK_NAME],
    )?;
    Ok(())
}

/// Creates a new deck in the database
pub fn new_deck(name: &str, conn: &Connection) -> Result<()> {
    conn.execute("INSERT INTO decks (name) VALUES (?1)", params![name])?;
    info!("deck '{}' created", name);
    Ok(())
}

/// Deletes a deck and all of its cards.
///
/// Returns `false` without deleting anything for the `Default` deck.
pub fn delete_deck(name: &str, conn: &Connection) -> Result<bool> {
    if name == DEFAULT_DECK_NAME {
        return Ok(false);
    }
    conn.execute("DELETE FROM cards WHERE deck_name = ?1", params![name])?;
    conn.execute("DELETE FROM decks WHERE name = ?1", params![name])?;
    info!("deck '{}' deleted", name);
    Ok(true)
}

/// Retrieves all deck names from the database
pub fn get_all_decks(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM decks")?;
    let decks = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>>>()?;
    Ok(decks)
}

/// Inserts a card into a deck preserving its scheduling state.
///
/// The stored id is assigned by the database and returned; the id on the
/// given card is ignored.
pub fn insert_card(deck_name: &str, card: &Card, conn: &Connection) -> Result<i64> {
    conn.execute(
        "INSERT INTO cards (deck_name, front, back, due_at, interval_days, ease_factor)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            deck_name,
            card.front,
            card.back,
            card.due_at,
            card.interval_days,
            card.ease_factor
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Adds a fresh card to a deck, due immediately, and returns its id.
pub fn add_card(
    deck_name: &str,
    front: &str,
    back: &str,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<i64> {
    insert_card(deck_name, &Card::new(0, front, back, now), conn)
}

/// Removes a single card.
pub fn delete_card(id: i64, conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM cards WHERE id = ?1", params![id])?;
    Ok(())
}

/// Retrieves all cards in a deck. A deck with zero cards yields an empty
/// vector, not an error.
pub fn get_cards(deck_name: &str, conn: &Connection) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(
        "SELECT id, front, back, due_at, interval_days, ease_factor
         FROM cards WHERE deck_name = ?1",
    )?;

    let cards = stmt
        .query_map(params![deck_name], |row| {
            Ok(Card {
                id: row.get(0)?,
                front: row.get(1)?,
                back: row.get(2)?,
                due_at: row.get(3)?,
                interval_days: row.get(4)?,
                ease_factor: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<Card>>>()?;

    Ok(cards)
}

/// Writes a card's current state back to the store after a rating or edit.
pub fn update_card(card: &Card, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE cards
         SET front = ?1, back = ?2, due_at = ?3, interval_days = ?4, ease_factor = ?5
         WHERE id = ?6",
        params![
            card.front,
            card.back,
            card.due_at,
            card.interval_days,
            card.ease_factor,
            card.id
        ],
    )?;
    Ok(())
}

/// Loads every deck with its cards into memory.
pub fn load_all_decks(conn: &Connection) -> Result<DeckSet> {
    let deck_names = get_all_decks(conn)?;

    let mut decks = Vec::new();
    for name in deck_names {
        let cards = get_cards(&name, conn)?;
        decks.push(Deck { name, cards });
    }

    Ok(DeckSet { decks })
}

/// One entry in the review log.
pub struct ReviewLogEntry {
    pub reviewed_at: String,
    pub card_id: i64,
    pub deck_name: String,
    pub quality: u8,
    pub new_interval_days: i64,
}

/// Appends a review event to the log. The card carries its post-rating
/// state, so `new_interval_days` records what the scheduler just computed.
pub fn log_review(
    card: &Card,
    deck_name: &str,
    rating: Rating,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<()> {
    conn.execute(
        "INSERT INTO review_log (reviewed_at, card_id, deck_name, quality, new_interval_days)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            due_date::format(now),
            card.id,
            deck_name,
            rating.quality(),
            card.interval_days
        ],
    )?;
    Ok(())
}

/// Retrieves the most recent review events, newest first.
pub fn recent_reviews(limit: usize, conn: &Connection) -> Result<Vec<ReviewLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT reviewed_at, card_id, deck_name, quality, new_interval_days
         FROM review_log ORDER BY id DESC LIMIT ?1",
    )?;

    let entries = stmt
        .query_map(params![limit as i64], |row| {
            Ok(ReviewLogEntry {
                reviewed_at: row.get(0)?,
                card_id: row.get(1)?,
                deck_name: row.get(2)?,
                quality: row.get::<_, i64>(3)? as u8,
                new_interval_days: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(entries)
}
