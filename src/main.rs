mod app;
use cardbox_app::*;

use app::CardboxApp;
use chrono::Utc;
use database::db;
use log::info;
use models::deck::DEFAULT_DECK_NAME;

fn main() -> eframe::Result<()> {
    init_logging();

    let conn = db::init_database().expect("Failed to initialize database");

    seed_sample_cards(&conn);

    let deck_set = db::load_all_decks(&conn).expect("Failed to load decks from database");

    info!("loaded {} decks from database", deck_set.decks.len());
    for deck in &deck_set.decks {
        info!("  - {} ({} cards)", deck.name, deck.cards.len());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Cardbox",
        options,
        Box::new(|_cc| Ok(Box::new(CardboxApp::new_with_deckset(deck_set, conn)))),
    )
}

/// Puts a few cards into the Default deck on first run.
fn seed_sample_cards(conn: &rusqlite::Connection) {
    let no_cards = db::get_cards(DEFAULT_DECK_NAME, conn)
        .map(|cards| cards.is_empty())
        .unwrap_or(false);
    let only_default = db::get_all_decks(conn)
        .map(|decks| decks.len() == 1)
        .unwrap_or(false);

    if no_cards && only_default {
        let now = Utc::now();
        let _ = db::add_card(DEFAULT_DECK_NAME, "capital of France", "Paris", now, conn);
        let _ = db::add_card(DEFAULT_DECK_NAME, "capital of Japan", "Tokyo", now, conn);
        let _ = db::add_card(DEFAULT_DECK_NAME, "capital of Brazil", "Brasília", now, conn);
        info!("sample cards created");
    }
}

fn init_logging() {
    let configured = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .apply();

    if configured.is_err() {
        eprintln!("logger was already initialized");
    }
}
