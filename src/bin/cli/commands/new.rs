use std::path::Path;

use anyhow::{bail, Context, Result};

use flashdeck_lib::flashcards::Deck;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, deck_path: &Path, name: &str, force: bool, format: &OutputFormat) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Deck name cannot be empty");
    }
    if deck_path.exists() && !force {
        bail!("{} already exists, use --force to overwrite it", deck_path.display());
    }

    let deck = Deck::new(name);
    app.session
        .save_deck(&deck, deck_path)
        .with_context(|| format!("Failed to write deck {:?}", deck_path))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": deck.name,
                "path": deck_path.to_string_lossy(),
                "flashcardCount": 0,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Created deck \"{}\" at {}", deck.name, deck_path.display());
        }
    }

    Ok(())
}
