//! Main application UI and state management.
//! Handles deck management, review sessions, and deck import/export.

use crate::database::db;
use crate::export::json::{export_json_to_path, import_json};
use crate::models::deck::DEFAULT_DECK_NAME;
use crate::models::{Card, Deck, DeckSet, Rating, ReviewQueue, scheduler};
use chrono::{Local, Utc};
use eframe::egui;
use log::error;
use rusqlite::Connection;

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Main,
    Review,
}

/// An in-progress review session over one deck.
struct ReviewSession {
    deck_name: String,
    queue: ReviewQueue,
    showing_answer: bool,
    reviewed: usize,
}

/// Main application state
pub struct CardboxApp {
    all_decks: DeckSet,
    selected_deck_index: Option<usize>,
    new_front: String,
    new_back: String,
    new_deck_name: String,
    conn: Connection,

    current_screen: AppScreen,
    session: Option<ReviewSession>,

    show_export_dialog: bool,
    show_result_dialog: bool,
    result_message: String,
    show_history: bool,
}

impl eframe::App for CardboxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Review => self.render_review_screen(ctx),
        }

        // exporting a deck
        if self.show_export_dialog {
            let mut export_deck_index: Option<usize> = None;
            let mut should_cancel = false;

            egui::Window::new("Export Deck")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Select a deck to export:");
                    ui.separator();

                    for (i, deck) in self.all_decks.decks.iter().enumerate() {
                        if ui
                            .button(format!("{} ({} cards)", deck.name, deck.cards.len()))
                            .clicked()
                        {
                            export_deck_index = Some(i);
                        }
                    }

                    ui.separator();

                    if ui.button("Cancel").clicked() {
                        should_cancel = true;
                    }
                });

            if let Some(i) = export_deck_index {
                self.handle_export(i);
            }
            if should_cancel {
                self.show_export_dialog = false;
            }
        }

        if self.show_result_dialog {
            egui::Window::new("Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }

        if self.show_history {
            self.render_history_window(ctx);
        }
    }
}

impl CardboxApp {
    /// Creates a new application instance with decks loaded from the database
    pub fn new_with_deckset(deckset: DeckSet, conn: Connection) -> Self {
        let has_decks = !deckset.decks.is_empty();
        Self {
            all_decks: deckset,
            selected_deck_index: if has_decks { Some(0) } else { None },
            new_front: String::new(),
            new_back: String::new(),
            new_deck_name: String::new(),
            conn,
            current_screen: AppScreen::Main,
            session: None,
            show_export_dialog: false,
            show_result_dialog: false,
            result_message: String::new(),
            show_history: false,
        }
    }

    fn show_result(&mut self, message: String) {
        self.result_message = message;
        self.show_result_dialog = true;
    }

    /// Renders the main screen with the deck management interface
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let now = Utc::now();

            ui.label(format!("Today: {}", Local::now().format("%Y-%m-%d")));
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Export Deck").clicked() {
                    self.show_export_dialog = true;
                }
                if ui.button("Import Deck").clicked() {
                    self.handle_import();
                }
                if ui.button("Review History").clicked() {
                    self.show_history = true;
                }
            });

            ui.separator();

            ui.heading("Create New Deck");
            ui.horizontal(|ui| {
                ui.label("Deck name:");
                ui.text_edit_singleline(&mut self.new_deck_name);
                if ui.button("Create Deck").clicked() {
                    self.handle_create_deck();
                }
            });

            ui.separator();

            ui.heading(format!("Decks ({})", self.all_decks.decks.len()));

            // Actions are queued during rendering to avoid borrowing conflicts
            let mut action_select: Option<usize> = None;
            let mut action_review: Option<(usize, bool)> = None;
            let mut action_delete_deck: Option<usize> = None;

            egui::ScrollArea::vertical()
                .id_salt("decks_list")
                .max_height(150.0)
                .show(ui, |ui| {
                    for (i, deck) in self.all_decks.decks.iter().enumerate() {
                        let is_selected = self.selected_deck_index == Some(i);

                        ui.horizontal(|ui| {
                            if ui
                                .selectable_label(
                                    is_selected,
                                    format!(
                                        "{} ({} cards, {} due)",
                                        deck.name,
                                        deck.cards.len(),
                                        deck.due_count(now)
                                    ),
                                )
                                .clicked()
                            {
                                action_select = Some(i);
                            }

                            if ui.button("Review").clicked() {
                                action_review = Some((i, false));
                            }
                            if ui.button("Review All").clicked() {
                                action_review = Some((i, true));
                            }

                            let deletable = deck.name != DEFAULT_DECK_NAME;
                            if ui.add_enabled(deletable, egui::Button::new("Delete")).clicked() {
                                action_delete_deck = Some(i);
                            }
                        });
                    }
                });

            // Execute deferred actions
            if let Some(i) = action_select {
                self.selected_deck_index = Some(i);
            }
            if let Some((i, include_all)) = action_review {
                self.start_review(i, include_all);
            }
            if let Some(i) = action_delete_deck {
                self.handle_delete_deck(i);
            }

            ui.separator();

            // Card management for the selected deck
            let mut action_add_card = false;
            let mut action_delete_card: Option<i64> = None;

            if let Some(deck_index) = self.selected_deck_index {
                if let Some(current_deck) = self.all_decks.decks.get(deck_index) {
                    ui.heading(format!("Selected Deck: {}", current_deck.name));

                    ui.horizontal(|ui| {
                        ui.label("Front:");
                        ui.text_edit_singleline(&mut self.new_front);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Back:");
                        ui.text_edit_singleline(&mut self.new_back);
                    });
                    if ui.button("Add Card").clicked() {
                        action_add_card = true;
                    }

                    ui.separator();

                    ui.heading(format!("Cards ({})", current_deck.cards.len()));

                    egui::ScrollArea::vertical()
                        .id_salt("cards_list")
                        .max_height(200.0)
                        .show(ui, |ui| {
                            for card in &current_deck.cards {
                                ui.group(|ui| {
                                    ui.horizontal(|ui| {
                                        ui.vertical(|ui| {
                                            ui.label(format!("Front: {}", card.front));
                                            ui.label(format!("Back: {}", card.back));
                                        });
                                        if ui.button("Delete").clicked() {
                                            action_delete_card = Some(card.id);
                                        }
                                    });
                                });
                            }
                        });
                }
            } else {
                ui.label("Select a deck to add cards");
            }

            if action_add_card {
                self.handle_add_card();
            }
            if let Some(card_id) = action_delete_card {
                self.handle_delete_card(card_id);
            }
        });
    }

    /// Renders the review screen: front of the head card, answer reveal,
    /// and the four rating buttons.
    fn render_review_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.session else {
                self.current_screen = AppScreen::Main;
                return;
            };

            ui.heading(format!("Reviewing: {}", session.deck_name));
            ui.label(format!(
                "{} cards left, {} reviewed",
                session.queue.len(),
                session.reviewed
            ));
            ui.add_space(20.0);

            let head = self
                .all_decks
                .deck(&session.deck_name)
                .and_then(|deck| session.queue.head_card(deck));

            // Store actions to execute after rendering
            let mut action_show_answer = false;
            let mut action_rate: Option<Rating> = None;
            let mut action_back = false;

            if let Some(card) = head {
                ui.group(|ui| {
                    ui.set_min_height(200.0);
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);

                        ui.heading("Front:");
                        ui.label(&card.front);

                        ui.add_space(20.0);

                        if session.showing_answer {
                            ui.heading("Back:");
                            ui.label(&card.back);
                        } else {
                            ui.label("(Click 'Show Answer' to reveal)");
                        }

                        ui.add_space(20.0);
                    });
                });

                ui.add_space(20.0);

                if !session.showing_answer {
                    if ui.button("Show Answer").clicked() {
                        action_show_answer = true;
                    }
                } else {
                    ui.label("How well did you remember it?");
                    ui.horizontal(|ui| {
                        for rating in Rating::ALL {
                            if ui.button(rating.label()).clicked() {
                                action_rate = Some(rating);
                            }
                        }
                    });
                }
            } else {
                ui.heading("Session complete!");
                ui.label(format!(
                    "No more cards due in '{}' for now. {} reviewed.",
                    session.deck_name, session.reviewed
                ));
            }

            ui.add_space(20.0);

            if ui.button("Back to Main Screen").clicked() {
                action_back = true;
            }

            // Execute deferred actions
            if action_show_answer {
                if let Some(session) = self.session.as_mut() {
                    session.showing_answer = true;
                }
            }
            if let Some(rating) = action_rate {
                self.rate_head(rating);
            }
            if action_back {
                self.current_screen = AppScreen::Main;
                self.session = None;
            }
        });
    }

    fn render_history_window(&mut self, ctx: &egui::Context) {
        let entries = db::recent_reviews(50, &self.conn).unwrap_or_default();

        egui::Window::new("Review History")
            .open(&mut self.show_history)
            .resizable(false)
            .show(ctx, |ui| {
                if entries.is_empty() {
                    ui.label("No reviews yet.");
                    return;
                }

                egui::ScrollArea::vertical()
                    .id_salt("history_list")
                    .max_height(300.0)
                    .show(ui, |ui| {
                        for entry in &entries {
                            let rating = Rating::from_quality(entry.quality)
                                .map(|rating| rating.label())
                                .unwrap_or("?");
                            ui.label(format!(
                                "{}  {}  card #{}  {}  next in {}d",
                                entry.reviewed_at,
                                entry.deck_name,
                                entry.card_id,
                                rating,
                                entry.new_interval_days
                            ));
                        }
                    });
            });
    }

    /// Starts a review session over the deck's due cards, or over every
    /// card when `include_all` is set.
    fn start_review(&mut self, deck_index: usize, include_all: bool) {
        let now = Utc::now();
        let mut rng = rand::rng();
        let Some(deck) = self.all_decks.decks.get_mut(deck_index) else {
            return;
        };

        let queue = if include_all {
            ReviewQueue::load_all(deck, &mut rng)
        } else {
            // Remember which cards the load will repair, so the fixed due
            // times can be written back to the store.
            let repaired: Vec<i64> = deck
                .cards
                .iter()
                .filter(|card| card.due_time().is_none())
                .map(|card| card.id)
                .collect();

            let queue = ReviewQueue::load_eligible(deck, now, &mut rng);

            for id in repaired {
                if let Some(card) = deck.card(id) {
                    if let Err(err) = db::update_card(card, &self.conn) {
                        error!("failed to persist repaired card {id}: {err}");
                    }
                }
            }
            queue
        };

        if queue.is_empty() {
            let message = if include_all {
                format!("'{}' has no cards to review.", deck.name)
            } else {
                format!("No cards due in '{}' right now.", deck.name)
            };
            self.show_result(message);
            return;
        }

        self.session = Some(ReviewSession {
            deck_name: deck.name.clone(),
            queue,
            showing_answer: false,
            reviewed: 0,
        });
        self.current_screen = AppScreen::Review;
    }

    /// Applies a rating to the head card: scheduler update, persistence,
    /// review log append, then removal from the queue by identity.
    fn rate_head(&mut self, rating: Rating) {
        let now = Utc::now();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(card_id) = session.queue.peek_head() else {
            return;
        };

        let Some(deck) = self.all_decks.deck_mut(&session.deck_name) else {
            return;
        };
        let Some(card) = deck.card_mut(card_id) else {
            // The card was deleted while queued; drop it and move on.
            session.queue.remove_by_id(card_id);
            return;
        };

        scheduler::apply_rating(card, rating, now);

        if let Err(err) = db::update_card(card, &self.conn) {
            error!("failed to persist card {card_id}: {err}");
        }
        if let Err(err) = db::log_review(card, &session.deck_name, rating, now, &self.conn) {
            error!("failed to log review of card {card_id}: {err}");
        }

        session.queue.remove_by_id(card_id);
        session.showing_answer = false;
        session.reviewed += 1;
    }

    fn handle_create_deck(&mut self) {
        let name = self.new_deck_name.trim().to_string();
        if name.is_empty() {
            return;
        }
        if self.all_decks.deck(&name).is_some() {
            self.show_result(format!("A deck named '{name}' already exists."));
            return;
        }

        match db::new_deck(&name, &self.conn) {
            Ok(()) => {
                self.all_decks.decks.push(Deck {
                    name,
                    cards: Vec::new(),
                });
                self.new_deck_name.clear();
            }
            Err(err) => self.show_result(format!("Failed to create deck: {err}")),
        }
    }

    fn handle_delete_deck(&mut self, deck_index: usize) {
        let Some(deck) = self.all_decks.decks.get(deck_index) else {
            return;
        };

        match db::delete_deck(&deck.name, &self.conn) {
            Ok(true) => {
                self.all_decks.decks.remove(deck_index);
                match self.selected_deck_index {
                    Some(selected) if selected == deck_index => self.selected_deck_index = None,
                    Some(selected) if selected > deck_index => {
                        self.selected_deck_index = Some(selected - 1)
                    }
                    _ => {}
                }
            }
            Ok(false) => {
                self.show_result(format!("The '{DEFAULT_DECK_NAME}' deck cannot be deleted."))
            }
            Err(err) => self.show_result(format!("Failed to delete deck: {err}")),
        }
    }

    fn handle_add_card(&mut self) {
        let Some(deck_index) = self.selected_deck_index else {
            return;
        };
        let front = self.new_front.trim().to_string();
        let back = self.new_back.trim().to_string();
        if front.is_empty() || back.is_empty() {
            return;
        }

        let now = Utc::now();
        let Some(deck) = self.all_decks.decks.get_mut(deck_index) else {
            return;
        };

        match db::add_card(&deck.name, &front, &back, now, &self.conn) {
            Ok(id) => {
                deck.cards.push(Card::new(id, &front, &back, now));
                self.new_front.clear();
                self.new_back.clear();
            }
            Err(err) => self.show_result(format!("Failed to add card: {err}")),
        }
    }

    fn handle_delete_card(&mut self, card_id: i64) {
        let Some(deck_index) = self.selected_deck_index else {
            return;
        };

        if let Err(err) = db::delete_card(card_id, &self.conn) {
            self.show_result(format!("Failed to delete card: {err}"));
            return;
        }
        if let Some(deck) = self.all_decks.decks.get_mut(deck_index) {
            deck.cards.retain(|card| card.id != card_id);
        }
    }

    /// Handles deck export to a JSON file
    fn handle_export(&mut self, deck_index: usize) {
        if let Some(deck) = self.all_decks.decks.get(deck_index) {
            if let Some(path) = rfd::FileDialog::new()
                .set_file_name(format!("{}.json", deck.name))
                .add_filter("JSON files", &["json"])
                .save_file()
            {
                let message = match export_json_to_path(deck, &path) {
                    Ok(()) => format!("Deck '{}' exported successfully!", deck.name),
                    Err(err) => format!("Export failed: {err}"),
                };
                self.show_result(message);
            }
        }
        self.show_export_dialog = false;
    }

    /// Handles deck import from a JSON file
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        let deck = match import_json(&path) {
            Ok(deck) => deck,
            Err(err) => {
                self.show_result(format!("Import failed: {err}"));
                return;
            }
        };

        if self.all_decks.deck(&deck.name).is_some() {
            self.show_result(format!(
                "Deck '{}' already exists! Rename it in the JSON file first.",
                deck.name
            ));
            return;
        }
        if let Err(err) = db::new_deck(&deck.name, &self.conn) {
            self.show_result(format!("Failed to create deck: {err}"));
            return;
        }

        // Cards keep their scheduling state but get fresh store ids.
        let mut stored = Deck {
            name: deck.name.clone(),
            cards: Vec::new(),
        };
        for card in &deck.cards {
            match db::insert_card(&deck.name, card, &self.conn) {
                Ok(id) => {
                    let mut card = card.clone();
                    card.id = id;
                    stored.cards.push(card);
                }
                Err(err) => {
                    self.show_result(format!("Failed to import card '{}': {err}", card.front));
                    return;
                }
            }
        }

        let message = format!("Deck '{}' imported with {} cards!", stored.name, stored.cards.len());
        self.all_decks.decks.push(stored);
        self.show_result(message);
    }
}
