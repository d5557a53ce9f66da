//! Data models for the flashcard system

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a card.
///
/// Generated once when the card is created and shared by every clone of it,
/// so two cards with identical text are still distinct cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A flashcard with a question (front) and answer (back)
///
/// Image fields hold a dereferenceable location: an `http(s)://` URL, a
/// `file:` URI, or a plain filesystem path.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    id: CardId,
    pub question: String,
    pub answer: String,
    pub hint: Option<String>,
    pub question_image: Option<String>,
    pub answer_image: Option<String>,
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            question: question.into(),
            answer: answer.into(),
            hint: None,
            question_image: None,
            answer_image: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_question_image(mut self, image: impl Into<String>) -> Self {
        self.question_image = Some(image.into());
        self
    }

    pub fn with_answer_image(mut self, image: impl Into<String>) -> Self {
        self.answer_image = Some(image.into());
        self
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    /// A copy of this card's content under a new identity
    pub fn duplicate(&self) -> Self {
        Self {
            id: CardId::new(),
            ..self.clone()
        }
    }

    /// True if `other` is the same card, regardless of its current text
    pub fn is_same_card(&self, other: &Card) -> bool {
        self.id == other.id
    }
}

/// A named, ordered collection of flashcards.
///
/// Order is meaningful: it is the iteration order used by rotational study.
/// A deck never holds the same card twice.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub name: String,
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }

    /// Append a card. Returns false (and leaves the deck untouched) if the
    /// card is already part of this deck.
    pub fn add_card(&mut self, card: Card) -> bool {
        if self.cards.iter().any(|c| c.is_same_card(&card)) {
            return false;
        }
        self.cards.push(card);
        true
    }

    pub fn remove_card(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Append a copy of the card at `index` and return the copy's id
    pub fn duplicate_card(&mut self, index: usize) -> Option<CardId> {
        let copy = self.cards.get(index)?.duplicate();
        let id = copy.id();
        self.cards.push(copy);
        Some(id)
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.cards.get_mut(index)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_is_not_same_card() {
        let a = Card::new("2 + 2", "4");
        let b = Card::new("2 + 2", "4");
        assert!(!a.is_same_card(&b));
        assert_ne!(a, b);

        let a_clone = a.clone();
        assert!(a.is_same_card(&a_clone));
    }

    #[test]
    fn test_deck_rejects_duplicate_card() {
        let mut deck = Deck::new("Arithmetic");
        let card = Card::new("1 + 1", "2").with_hint("count");

        assert!(deck.add_card(card.clone()));
        assert!(!deck.add_card(card.clone()));
        assert_eq!(deck.len(), 1);

        // Same text, new card
        assert!(deck.add_card(Card::new("1 + 1", "2")));
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_remove_cards() {
        let mut deck = Deck::new("Capitals");
        let paris = Card::new("France", "Paris");
        let rome = Card::new("Italy", "Rome");
        deck.add_card(paris.clone());
        deck.add_card(rome.clone());

        let removed = deck.remove_card(0).unwrap();
        assert!(removed.is_same_card(&paris));
        assert_eq!(deck.card(0).unwrap().answer, "Rome");
        assert!(deck.remove_card(5).is_none());

        deck.clear();
        assert!(deck.is_empty());
    }

    #[test]
    fn test_duplicate_card() {
        let mut deck = Deck::new("Capitals");
        let paris = Card::new("France", "Paris")
            .with_hint("Eiffel")
            .with_question_image("https://example.com/fr.png");
        deck.add_card(paris.clone());
        deck.add_card(Card::new("Italy", "Rome"));

        let id = deck.duplicate_card(0).unwrap();
        assert_eq!(deck.len(), 3);

        let copy = deck.card(2).unwrap();
        assert_eq!(copy.id(), id);
        assert!(!copy.is_same_card(&paris));
        assert_eq!(copy.question, "France");
        assert_eq!(copy.hint.as_deref(), Some("Eiffel"));
        assert_eq!(copy.question_image, paris.question_image);

        // Editing the copy leaves the original alone
        deck.card_mut(2).unwrap().answer = "Lyon".to_string();
        assert_eq!(deck.card(0).unwrap().answer, "Paris");

        assert!(deck.duplicate_card(7).is_none());
    }
}
