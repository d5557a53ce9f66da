use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &mut App, deck_path: &Path, format: &OutputFormat, use_color: bool) -> Result<()> {
    let deck = app
        .session
        .codec()
        .decode(deck_path)
        .with_context(|| format!("Failed to open deck {:?}", deck_path))?;

    match format {
        OutputFormat::Json => {
            let cards: Vec<_> = deck
                .cards()
                .iter()
                .map(|card| {
                    serde_json::json!({
                        "question": card.question,
                        "answer": card.answer,
                        "hint": card.hint,
                        "questionImage": card.question_image,
                        "answerImage": card.answer_image,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "name": deck.name,
                "flashcardCount": deck.len(),
                "flashcards": cards,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::paint(&deck.name, Color::BOLD, use_color));
            println!("{} cards", deck.len());

            for (i, card) in deck.cards().iter().enumerate() {
                println!();
                println!("{}. {}", i + 1, terminal::render_question(card, use_color));
                if let Some(ref hint) = card.hint {
                    if !hint.is_empty() {
                        println!("   {}", terminal::paint(&format!("hint: {}", hint), Color::DIM, use_color));
                    }
                }
                println!("   {}", terminal::render_answer(card, use_color));
            }
        }
    }

    Ok(())
}
