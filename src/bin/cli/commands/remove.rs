use std::path::Path;

use anyhow::{Context, Result};

use crate::app::{card_index, App};
use crate::OutputFormat;

pub fn run(app: &mut App, deck_path: &Path, number: usize, format: &OutputFormat) -> Result<()> {
    let (deck, removed) = app.edit_deck(deck_path, |deck| {
        let index = card_index(deck, number)?;
        deck.remove_card(index)
            .with_context(|| format!("Card {} does not exist", number))
    })?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deck": deck.name,
                "removed": removed.question,
                "flashcardCount": deck.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Removed card {} from \"{}\": {}", number, deck.name, removed.question);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_lib::flashcards::{Card, Deck};
    use tempfile::TempDir;

    #[test]
    fn test_remove_by_number() {
        let temp = TempDir::new().unwrap();
        let mut app = App::new(Some(temp.path().join("config.json")), 1).unwrap();
        let path = temp.path().join("deck.json");
        let mut deck = Deck::new("Birds");
        deck.add_card(Card::new("Flightless?", "Emu"));
        deck.add_card(Card::new("Fastest?", "Falcon"));
        app.session.save_deck(&deck, &path).unwrap();

        run(&mut app, &path, 1, &OutputFormat::Plain).unwrap();
        assert!(run(&mut app, &path, 2, &OutputFormat::Plain).is_err());

        let deck = app.session.codec().decode(&path).unwrap();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.card(0).unwrap().answer, "Falcon");
    }
}
