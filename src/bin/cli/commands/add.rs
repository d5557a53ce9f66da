use std::path::Path;

use anyhow::{bail, Result};

use flashdeck_lib::flashcards::Card;

use crate::app::App;
use crate::OutputFormat;

/// Content of a new card
#[derive(clap::Args, Debug, Clone)]
pub struct NewCard {
    /// Front of the card
    #[arg(long, short)]
    pub question: String,
    /// Back of the card
    #[arg(long, short)]
    pub answer: String,
    #[arg(long)]
    pub hint: Option<String>,
    /// Image URL, file: URI or path shown with the question
    #[arg(long)]
    pub question_image: Option<String>,
    /// Image URL, file: URI or path shown with the answer
    #[arg(long)]
    pub answer_image: Option<String>,
}

impl NewCard {
    pub fn into_card(self) -> Result<Card> {
        let question = self.question.trim();
        let answer = self.answer.trim();
        if question.is_empty() || answer.is_empty() {
            bail!("A card needs both a question and an answer");
        }

        let mut card = Card::new(question, answer);
        card.hint = self.hint.map(|h| h.trim().to_string());
        card.question_image = self.question_image.filter(|i| !i.trim().is_empty());
        card.answer_image = self.answer_image.filter(|i| !i.trim().is_empty());
        Ok(card)
    }
}

pub fn run(app: &mut App, deck_path: &Path, new_card: NewCard, format: &OutputFormat) -> Result<()> {
    let card = new_card.into_card()?;
    let (deck, _) = app.edit_deck(deck_path, |deck| {
        deck.add_card(card.clone());
        Ok(())
    })?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deck": deck.name,
                "number": deck.len(),
                "question": card.question,
                "answer": card.answer,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Added card {} to \"{}\": {}", deck.len(), deck.name, card.question);
        }
    }

    Ok(())
}
