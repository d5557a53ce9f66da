//! Flashcards and decks for Flashdeck
//!
//! This module provides:
//! - The card and deck data model
//! - The deck document codec (load/save)
//! - Inline image transcoding used by the codec

pub mod codec;
pub mod images;
pub mod models;

pub use codec::{CodecConfig, CodecError, DeckCodec};
pub use images::ImageError;
pub use models::*;
