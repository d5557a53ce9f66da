use std::path::Path;

use anyhow::{Context, Result};

use crate::app::{card_index, App};
use crate::OutputFormat;

pub fn run(app: &mut App, deck_path: &Path, number: usize, format: &OutputFormat) -> Result<()> {
    let (deck, _) = app.edit_deck(deck_path, |deck| {
        let index = card_index(deck, number)?;
        deck.duplicate_card(index)
            .with_context(|| format!("Card {} does not exist", number))
    })?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deck": deck.name,
                "source": number,
                "number": deck.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Copied card {} to card {} in \"{}\"", number, deck.len(), deck.name);
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
    fn test_duplicate_appends_copy() {
        let temp = TempDir::new().unwrap();
        let mut app = App::new(Some(temp.path().join("config.json")), 1).unwrap();
        let path = temp.path().join("deck.json");
        let mut deck = Deck::new("Rivers");
        deck.add_card(Card::new("Longest?", "Nile").with_hint("Africa"));
        deck.add_card(Card::new("Through Vienna?", "Danube"));
        app.session.save_deck(&deck, &path).unwrap();

        run(&mut app, &path, 1, &OutputFormat::Plain).unwrap();
        assert!(run(&mut app, &path, 9, &OutputFormat::Plain).is_err());

        let deck = app.session.codec().decode(&path).unwrap();
        assert_eq!(deck.len(), 3);
        let copy = deck.card(2).unwrap();
        assert_eq!(copy.answer, "Nile");
        assert_eq!(copy.hint.as_deref(), Some("Africa"));
    }
}
