use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, deck_path: &Path, output: &Path, format: &OutputFormat) -> Result<()> {
    let deck = app
        .session
        .open_deck(deck_path)
        .with_context(|| format!("Failed to open deck {:?}", deck_path))?;

    app.session
        .save_deck(&deck, output)
        .with_context(|| format!("Failed to write deck {:?}", output))?;

    match format {
        OutputFormat::Json => {
            let result = serde_json::json!({
                "name": deck.name,
                "flashcardCount": deck.len(),
                "output": output.to_string_lossy(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Plain => {
            println!("Exported '{}' ({} cards) to {}", deck.name, deck.len(), output.display());
        }
    }

    Ok(())
}
