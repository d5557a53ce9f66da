use std::path::Path;

use anyhow::{bail, Result};

use flashdeck_lib::flashcards::Card;

use crate::app::{card_index, App};
use crate::OutputFormat;

/// Changes to an existing card. Unset fields are left as they are.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CardEdit {
    #[arg(long, short)]
    pub question: Option<String>,
    #[arg(long, short)]
    pub answer: Option<String>,
    #[arg(long, conflicts_with = "no_hint")]
    pub hint: Option<String>,
    #[arg(long, conflicts_with = "no_question_image")]
    pub question_image: Option<String>,
    #[arg(long, conflicts_with = "no_answer_image")]
    pub answer_image: Option<String>,
    /// Remove the hint
    #[arg(long)]
    pub no_hint: bool,
    /// Remove the question image
    #[arg(long)]
    pub no_question_image: bool,
    /// Remove the answer image
    #[arg(long)]
    pub no_answer_image: bool,
}

impl CardEdit {
    pub fn apply(&self, card: &mut Card) -> Result<()> {
        if let Some(ref question) = self.question {
            if question.trim().is_empty() {
                bail!("Question cannot be empty");
            }
            card.question = question.trim().to_string();
        }
        if let Some(ref answer) = self.answer {
            if answer.trim().is_empty() {
                bail!("Answer cannot be empty");
            }
            card.answer = answer.trim().to_string();
        }

        if self.no_hint {
            card.hint = None;
        } else if let Some(ref hint) = self.hint {
            card.hint = Some(hint.trim().to_string());
        }
        if self.no_question_image {
            card.question_image = None;
        } else if let Some(ref image) = self.question_image {
            card.question_image = Some(image.clone());
        }
        if self.no_answer_image {
            card.answer_image = None;
        } else if let Some(ref image) = self.answer_image {
            card.answer_image = Some(image.clone());
        }
        Ok(())
    }
}

pub fn run(app: &mut App, deck_path: &Path, number: usize, edit: &CardEdit, format: &OutputFormat) -> Result<()> {
    let (deck, card) = app.edit_deck(deck_path, |deck| {
        let index = card_index(deck, number)?;
        let Some(card) = deck.card_mut(index) else {
            bail!("Card {} does not exist", number);
        };
        edit.apply(card)?;
        Ok(card.clone())
    })?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deck": deck.name,
                "number": number,
                "question": card.question,
                "answer": card.answer,
                "hint": card.hint,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Updated card {} in \"{}\": {}", number, deck.name, card.question);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_lib::flashcards::Deck;
    use tempfile::TempDir;

    #[test]
    fn test_apply_sets_and_clears_fields() {
        let mut card = Card::new("Q", "A")
            .with_hint("old")
            .with_question_image("https://example.com/q.png");

        let edit = CardEdit {
            answer: Some(" New answer ".to_string()),
            no_hint: true,
            no_question_image: true,
            answer_image: Some("https://example.com/a.png".to_string()),
            ..Default::default()
        };
        edit.apply(&mut card).unwrap();

        assert_eq!(card.question, "Q");
        assert_eq!(card.answer, "New answer");
        assert!(card.hint.is_none());
        assert!(card.question_image.is_none());
        assert_eq!(card.answer_image.as_deref(), Some("https://example.com/a.png"));

        let blank = CardEdit {
            question: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank.apply(&mut card).is_err());
    }

    #[test]
    fn test_edit_card_in_file() {
        let temp = TempDir::new().unwrap();
        let mut app = App::new(Some(temp.path().join("config.json")), 1).unwrap();
        let path = temp.path().join("deck.json");
        let mut deck = Deck::new("Planets");
        deck.add_card(Card::new("Largest?", "Saturn"));
        app.session.save_deck(&deck, &path).unwrap();

        let edit = CardEdit {
            answer: Some("Jupiter".to_string()),
            hint: Some("Great Red Spot".to_string()),
            ..Default::default()
        };
        run(&mut app, &path, 1, &edit, &OutputFormat::Plain).unwrap();
        assert!(run(&mut app, &path, 2, &edit, &OutputFormat::Plain).is_err());

        let card = app.session.codec().decode(&path).unwrap().card(0).cloned().unwrap();
        assert_eq!(card.answer, "Jupiter");
        assert_eq!(card.hint.as_deref(), Some("Great Red Spot"));
    }
}
