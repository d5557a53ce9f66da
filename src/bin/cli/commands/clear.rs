use std::path::Path;

use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, deck_path: &Path, format: &OutputFormat) -> Result<()> {
    let (deck, removed) = app.edit_deck(deck_path, |deck| {
        let count = deck.len();
        deck.clear();
        Ok(count)
    })?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "deck": deck.name, "removed": removed });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Removed all {} cards from \"{}\"", removed, deck.name);
        }
    }

    Ok(())
}
