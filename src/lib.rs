//! Flashdeck: study decks of question/answer cards.
//!
//! - [`flashcards`]: cards, decks and the JSON deck codec with inline images
//! - [`study`]: scheduling policies and the study session
//! - [`settings`]: persisted user options such as the last deck and theme

pub mod flashcards;
pub mod settings;
pub mod study;
