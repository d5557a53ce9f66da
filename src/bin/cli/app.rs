use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};

use flashdeck_lib::flashcards::{CodecConfig, Deck, DeckCodec};
use flashdeck_lib::settings::{JsonSettingsStore, SharedSettings};
use flashdeck_lib::study::StudySession;

/// Shared application state for CLI commands
pub struct App {
    pub settings: SharedSettings,
    pub session: StudySession,
}

impl App {
    /// Open the settings file and build the study session around it
    pub fn new(config_path: Option<PathBuf>, timeout_secs: u64) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => JsonSettingsStore::default_path().context("Failed to get config directory")?,
        };
        log::debug!("Using settings file {:?}", config_path);

        let settings = JsonSettingsStore::open(config_path).into_shared();
        let codec = DeckCodec::new(CodecConfig {
            fetch_timeout: Duration::from_secs(timeout_secs),
            ..Default::default()
        });
        let session = StudySession::new(codec, settings.clone());

        Ok(Self { settings, session })
    }

    /// Path of the last used deck
    pub fn last_deck_path(&self) -> Result<PathBuf> {
        let info = self
            .session
            .last_deck()
            .context("Failed to read settings")?
            .context("No deck given and no deck has been used yet")?;
        Ok(info.path)
    }

    /// Open a deck, apply `f` to it and save it back in place
    pub fn edit_deck<T>(&mut self, path: &Path, f: impl FnOnce(&mut Deck) -> Result<T>) -> Result<(Deck, T)> {
        let mut deck = self
            .session
            .open_deck(path)
            .with_context(|| format!("Failed to open deck {:?}", path))?;
        let value = f(&mut deck)?;
        self.session
            .save_deck(&deck, path)
            .with_context(|| format!("Failed to write deck {:?}", path))?;
        Ok((deck, value))
    }
}

/// Convert a 1-based card number as shown by `show` into an index
pub fn card_index(deck: &Deck, number: usize) -> Result<usize> {
    if number == 0 || number > deck.len() {
        bail!("Card {} does not exist, '{}' has {} cards", number, deck.name, deck.len());
    }
    Ok(number - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_lib::flashcards::Card;
    use tempfile::TempDir;

    fn create_test_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let app = App::new(Some(temp_dir.path().join("config.json")), 1).unwrap();
        (app, temp_dir)
    }

    #[test]
    fn test_edit_deck_saves_and_remembers() {
        let (mut app, temp) = create_test_app();
        let path = temp.path().join("deck.json");
        app.session.save_deck(&Deck::new("Words"), &path).unwrap();

        let (deck, added) = app
            .edit_deck(&path, |deck| Ok(deck.add_card(Card::new("Hund", "Dog"))))
            .unwrap();
        assert!(added);
        assert_eq!(deck.len(), 1);

        let reloaded = app.session.codec().decode(&path).unwrap();
        assert_eq!(reloaded.card(0).unwrap().answer, "Dog");
        assert_eq!(app.last_deck_path().unwrap(), path);
        assert_eq!(app.session.last_deck().unwrap().unwrap().flashcard_count, 1);
    }

    #[test]
    fn test_failed_edit_leaves_file_alone() {
        let (mut app, temp) = create_test_app();
        let path = temp.path().join("deck.json");
        let mut deck = Deck::new("Words");
        deck.add_card(Card::new("Katze", "Cat"));
        app.session.save_deck(&deck, &path).unwrap();

        let result = app.edit_deck(&path, |deck| {
            deck.clear();
            card_index(deck, 1)
        });
        assert!(result.is_err());
        assert_eq!(app.session.codec().decode(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_card_index_is_one_based() {
        let mut deck = Deck::new("Words");
        deck.add_card(Card::new("Maus", "Mouse"));
        assert_eq!(card_index(&deck, 1).unwrap(), 0);
        assert!(card_index(&deck, 0).is_err());
        assert!(card_index(&deck, 2).is_err());
    }
}
