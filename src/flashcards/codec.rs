//! Deck document codec
//!
//! Document layout:
//! ```json
//! {
//!   "name": "Capitals",
//!   "flashcards": [
//!     { "question": "France", "answer": "Paris", "hint": "...",
//!       "questionImage": "https://...", "answerImage": "<base64>" }
//!   ]
//! }
//! ```
//!
//! Structural problems (unreadable file, missing `name`/`question`/`answer`)
//! fail the whole operation. Image problems only drop the affected field.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::images::{self, ImageFetcher};
use super::models::{Card, Deck};

/// Image values up to this many characters are always treated as references
pub const DEFAULT_BLOB_THRESHOLD: usize = 100;

/// Default bound on a single remote image fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to read deck {path:?}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Malformed deck document {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write deck {path:?}: {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// True if the document could not be loaded at all
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Malformed { .. })
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeckDocument {
    name: String,
    flashcards: Vec<CardRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardRecord {
    question: String,
    answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    question_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    answer_image: Option<String>,
}

/// Codec configuration
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Timeout applied to each remote image fetch
    pub fetch_timeout: Duration,
    /// Where decoded images are written (system temp dir if unset)
    pub image_dir: Option<PathBuf>,
    /// Length above which a non-reference image value is an embedded blob
    pub blob_threshold: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            image_dir: None,
            blob_threshold: DEFAULT_BLOB_THRESHOLD,
        }
    }
}

/// Loads and saves decks. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct DeckCodec {
    config: CodecConfig,
}

impl DeckCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn image_dir(&self) -> PathBuf {
        self.config
            .image_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Load a deck from a document on disk.
    ///
    /// Embedded image blobs are written out to image files and the card
    /// fields point at those files afterwards.
    pub fn decode(&self, path: &Path) -> Result<Deck> {
        let content = fs::read_to_string(path).map_err(|source| CodecError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: DeckDocument =
            serde_json::from_str(&content).map_err(|source| CodecError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        let image_dir = self.image_dir();
        let mut deck = Deck::new(document.name);
        for record in document.flashcards {
            let mut card = Card::new(record.question, record.answer);
            card.hint = record.hint;
            card.question_image = self.resolve_image(record.question_image, &image_dir);
            card.answer_image = self.resolve_image(record.answer_image, &image_dir);
            deck.add_card(card);
        }

        log::info!("Loaded deck '{}' ({} cards) from {:?}", deck.name, deck.len(), path);
        Ok(deck)
    }

    fn resolve_image(&self, value: Option<String>, image_dir: &Path) -> Option<String> {
        let value = value.filter(|v| !v.trim().is_empty())?;
        if !images::is_embedded_blob(&value, self.config.blob_threshold) {
            return Some(value);
        }

        match images::decode_blob(&value).and_then(|bytes| images::write_image_file(&bytes, image_dir)) {
            Ok(uri) => Some(uri),
            Err(e) => {
                log::warn!("Dropping embedded image that could not be decoded: {}", e);
                None
            }
        }
    }

    /// Save a deck as a document on disk.
    ///
    /// Every image reference is loaded and embedded into the document. An
    /// image that cannot be loaded is left out of the saved card.
    pub fn encode(&self, deck: &Deck, path: &Path) -> Result<()> {
        let mut fetcher = ImageFetcher::new(self.config.fetch_timeout);

        let mut flashcards = Vec::with_capacity(deck.len());
        for card in deck.cards() {
            flashcards.push(CardRecord {
                question: card.question.clone(),
                answer: card.answer.clone(),
                hint: card.hint.clone(),
                question_image: self.embed_image(&mut fetcher, card.question_image.as_deref()),
                answer_image: self.embed_image(&mut fetcher, card.answer_image.as_deref()),
            });
        }

        let document = DeckDocument {
            name: deck.name.clone(),
            flashcards,
        };
        let mut content = serde_json::to_string_pretty(&document)?;
        content.push('\n');

        fs::write(path, content).map_err(|source| CodecError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("Saved deck '{}' ({} cards) to {:?}", deck.name, deck.len(), path);
        Ok(())
    }

    fn embed_image(&self, fetcher: &mut ImageFetcher, reference: Option<&str>) -> Option<String> {
        let reference = reference.filter(|r| !r.trim().is_empty())?;

        // Already inline, nothing to fetch
        if images::is_embedded_blob(reference, self.config.blob_threshold)
            && images::decode_blob(reference).is_ok()
        {
            return Some(reference.to_string());
        }

        match fetcher.load(reference) {
            Ok(bytes) => Some(images::encode_blob(&bytes)),
            Err(e) => {
                log::warn!("Leaving out image {}: {}", reference, e);
                None
            }
        }
    }
}
