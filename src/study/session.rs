//! Study session
//!
//! Ties the deck codec, the settings store and a study algorithm together.
//! All collaborators are passed in; nothing is looked up globally.

use std::path::Path;

use chrono::Utc;
use thiserror::Error;

use super::algorithm::{AlgorithmKind, StudyAlgorithm};
use crate::flashcards::{CodecError, Deck, DeckCodec};
use crate::settings::{
    lookup_as, save_as, DeckInfo, SettingsError, SettingsStore, SharedSettings, LAST_DECK_KEY,
};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Deck error: {0}")]
    Codec(#[from] CodecError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("No study session has been started")]
    NoActiveSession,
}

pub type Result<T> = std::result::Result<T, SessionError>;

pub struct StudySession {
    codec: DeckCodec,
    settings: SharedSettings,
    algorithm: Option<Box<dyn StudyAlgorithm>>,
}

impl StudySession {
    pub fn new(codec: DeckCodec, settings: SharedSettings) -> Self {
        Self {
            codec,
            settings,
            algorithm: None,
        }
    }

    pub fn codec(&self) -> &DeckCodec {
        &self.codec
    }

    pub fn settings(&self) -> SharedSettings {
        self.settings.clone()
    }

    /// Load a deck and remember it as the last used deck
    pub fn open_deck(&mut self, path: &Path) -> Result<Deck> {
        let deck = self.codec.decode(path)?;
        self.remember_deck(&deck, path);
        Ok(deck)
    }

    /// Save a deck and remember it as the last used deck
    pub fn save_deck(&mut self, deck: &Deck, path: &Path) -> Result<()> {
        self.codec.encode(deck, path)?;
        self.remember_deck(deck, path);
        Ok(())
    }

    /// Record `lastDeck` for `deck`. Mastery levels already stored for the
    /// same file are kept. Failures are logged, the deck operation itself
    /// already succeeded.
    fn remember_deck(&self, deck: &Deck, path: &Path) {
        let result = self.with_store(|store| {
            let mut info = DeckInfo::new(deck.name.clone(), path, deck.len());
            if let Some(previous) = lookup_as::<DeckInfo, _>(&*store, LAST_DECK_KEY)?.found() {
                if previous.path == path {
                    info.mastery_levels = previous.mastery_levels;
                    info.last_studied = previous.last_studied;
                }
            }
            save_as(&mut *store, LAST_DECK_KEY, &info)
        });

        if let Err(e) = result {
            log::warn!("Failed to remember deck {:?}: {}", path, e);
        }
    }

    /// Start studying `deck` with a fresh algorithm of the given kind
    pub fn start(&mut self, deck: &Deck, kind: AlgorithmKind, max_cycles: i32) -> &mut dyn StudyAlgorithm {
        let mut algorithm = kind.build(max_cycles, Some(self.settings.clone()));
        algorithm.initialize(deck.cards());
        log::info!(
            "Started {} session on '{}' ({} cards, max cycles {})",
            kind,
            deck.name,
            deck.len(),
            max_cycles
        );
        &mut **self.algorithm.insert(algorithm)
    }

    pub fn algorithm(&self) -> Option<&dyn StudyAlgorithm> {
        self.algorithm.as_deref()
    }

    pub fn algorithm_mut(&mut self) -> Option<&mut dyn StudyAlgorithm> {
        self.algorithm
            .as_mut()
            .map(|algorithm| -> &mut dyn StudyAlgorithm { &mut **algorithm })
    }

    /// Write the session's mastery snapshot into `lastDeck`.
    ///
    /// Returns the updated record, or `None` if no deck has been recorded yet.
    pub fn finish(&mut self) -> Result<Option<DeckInfo>> {
        let algorithm = self.algorithm.as_ref().ok_or(SessionError::NoActiveSession)?;
        let snapshot = algorithm.mastery_snapshot();

        let updated = self.with_store(|store| {
            let Some(mut info) = lookup_as::<DeckInfo, _>(&*store, LAST_DECK_KEY)?.found() else {
                return Ok(None);
            };
            info.mastery_levels = snapshot;
            info.last_studied = Some(Utc::now());
            save_as(&mut *store, LAST_DECK_KEY, &info)?;
            Ok(Some(info))
        })?;

        if updated.is_none() {
            log::debug!("No deck metadata recorded, session results not saved");
        }
        Ok(updated)
    }

    /// The last used deck, if any
    pub fn last_deck(&self) -> Result<Option<DeckInfo>> {
        let info = self.with_store(|store| lookup_as::<DeckInfo, _>(&*store, LAST_DECK_KEY))?;
        Ok(info.found())
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut (dyn SettingsStore + Send)) -> std::result::Result<T, SettingsError>,
    ) -> std::result::Result<T, SettingsError> {
        let mut store = self.settings.lock().map_err(|_| SettingsError::Unavailable)?;
        f(&mut *store)
    }
}
