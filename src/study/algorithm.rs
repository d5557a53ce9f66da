//! The study algorithm contract
//!
//! A study algorithm drives one review session over a private snapshot of
//! cards (the working set): which card is shown, how answers change each
//! card's mastery, and when the session is over.
//!
//! Lifecycle: a fresh algorithm has an empty working set. `initialize` makes
//! it active at cycle 0. Every time each card in the working set has been
//! answered once, a cycle closes. The session is complete once
//! `cycles_completed >= max_cycles` (never, if `max_cycles <= 0`).
//! `reset_session` goes back to cycle 0 with the same working set.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::mastery::MasteryWeightedAlgorithm;
use super::rotational::RotationalAlgorithm;
use crate::flashcards::{Card, CardId};
use crate::settings::{SettingsError, SharedSettings};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudyError {
    #[error("There are no cards to study")]
    EmptyDeck,

    #[error("Card is not part of this study session: {0}")]
    UnknownCard(CardId),
}

pub type Result<T> = std::result::Result<T, StudyError>;

/// Why a mastery snapshot could not be written to the settings store
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("No deck metadata to attach the mastery snapshot to")]
    PersistenceUnavailable,

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// A scheduling policy for a study session
pub trait StudyAlgorithm: Send {
    /// Human-readable policy name
    fn name(&self) -> &'static str;

    /// Start a new session over a snapshot of `cards`.
    ///
    /// Later edits to the caller's cards do not affect the session. An empty
    /// slice is accepted, but navigation then fails with `EmptyDeck`.
    fn initialize(&mut self, cards: &[Card]);

    /// Record an answer for `card`. A card already answered in the current
    /// cycle ignores further answers until the cycle closes.
    fn record_response(&mut self, card: &Card, is_correct: bool) -> Result<()>;

    /// Advance to the next card. Returns whether the position moved.
    fn move_to_next(&mut self) -> Result<bool>;

    /// Go back to the previous card. Returns whether the position moved.
    fn move_to_previous(&mut self) -> Result<bool>;

    fn current_card(&self) -> Option<&Card>;

    fn current_index(&self) -> usize;

    fn is_first_card(&self) -> bool;

    fn is_session_complete(&self) -> bool;

    fn has_answered_this_cycle(&self, card: &Card) -> bool;

    /// Presentation of the card's mastery score
    fn mastery_level(&self, card: &Card) -> Result<String>;

    /// Mastery scores keyed by question text, for the deck metadata record
    fn mastery_snapshot(&self) -> HashMap<String, i32>;

    fn total_correct(&self) -> u32;

    fn total_incorrect(&self) -> u32;

    fn cycles_completed(&self) -> u32;

    fn max_cycles(&self) -> i32;

    /// The working set in its current order
    fn working_set(&self) -> &[Card];

    /// Clear all counters and scores and restart at cycle 0
    fn reset_session(&mut self);
}

/// Available scheduling policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    /// Walk the deck in order, wrapping around
    Rotational,
    /// Reorder the deck after every cycle, weakest cards first
    MasteryWeighted,
}

impl AlgorithmKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rotational => "Basic Rotation",
            Self::MasteryWeighted => "Spaced Repetition",
        }
    }

    /// Create an uninitialized algorithm of this kind.
    ///
    /// `settings` is only used by the mastery-weighted policy, which keeps
    /// the last deck's mastery snapshot up to date.
    pub fn build(self, max_cycles: i32, settings: Option<SharedSettings>) -> Box<dyn StudyAlgorithm> {
        match self {
            Self::Rotational => Box::new(RotationalAlgorithm::new(max_cycles)),
            Self::MasteryWeighted => {
                let algorithm = MasteryWeightedAlgorithm::new(max_cycles);
                match settings {
                    Some(settings) => Box::new(algorithm.with_settings(settings)),
                    None => Box::new(algorithm),
                }
            }
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rotational" | "rotation" | "basic rotation" => Ok(Self::Rotational),
            "mastery" | "mastery-weighted" | "spaced repetition" => Ok(Self::MasteryWeighted),
            other => Err(format!("Unknown study algorithm: {}", other)),
        }
    }
}

/// State shared by every policy
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    /// Working set in current order
    pub cards: Vec<Card>,
    /// Working set as it was at initialize time
    pub initial_order: Vec<Card>,
    pub current_index: usize,
    pub answered: HashSet<CardId>,
    pub total_correct: u32,
    pub total_incorrect: u32,
    pub cycles_completed: u32,
    pub max_cycles: i32,
}

impl SessionState {
    pub fn new(max_cycles: i32) -> Self {
        Self {
            max_cycles,
            ..Default::default()
        }
    }

    /// Take a snapshot of `cards` (dropping repeated cards) and reset all counters
    pub fn load(&mut self, cards: &[Card]) {
        let mut seen = HashSet::new();
        self.cards = cards
            .iter()
            .filter(|card| seen.insert(card.id()))
            .cloned()
            .collect();
        if self.cards.len() != cards.len() {
            log::debug!("Dropped {} repeated cards from the working set", cards.len() - self.cards.len());
        }
        self.initial_order = self.cards.clone();
        self.reset();
    }

    /// Restore the initial order and clear all counters
    pub fn reset(&mut self) {
        self.cards = self.initial_order.clone();
        self.current_index = 0;
        self.answered.clear();
        self.total_correct = 0;
        self.total_incorrect = 0;
        self.cycles_completed = 0;
    }

    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.cards.is_empty() {
            Err(StudyError::EmptyDeck)
        } else {
            Ok(())
        }
    }

    /// Check that `card` belongs to the working set
    pub fn ensure_known(&self, card: &Card) -> Result<()> {
        self.ensure_not_empty()?;
        if self.cards.iter().any(|c| c.is_same_card(card)) {
            Ok(())
        } else {
            Err(StudyError::UnknownCard(card.id()))
        }
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.current_index)
    }

    /// True once every card in the working set has been answered this cycle
    pub fn all_answered(&self) -> bool {
        !self.cards.is_empty() && self.answered.len() == self.cards.len()
    }

    pub fn tally(&mut self, is_correct: bool) {
        if is_correct {
            self.total_correct += 1;
        } else {
            self.total_incorrect += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.max_cycles > 0 && self.cycles_completed as i64 >= self.max_cycles as i64
    }

    pub fn next_index(&self) -> usize {
        (self.current_index + 1) % self.cards.len()
    }

    pub fn previous_index(&self) -> usize {
        if self.current_index == 0 {
            self.cards.len() - 1
        } else {
            self.current_index - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_kind_parsing() {
        assert_eq!("rotational".parse::<AlgorithmKind>(), Ok(AlgorithmKind::Rotational));
        assert_eq!("Spaced Repetition".parse::<AlgorithmKind>(), Ok(AlgorithmKind::MasteryWeighted));
        assert!("leitner".parse::<AlgorithmKind>().is_err());
        assert_eq!(AlgorithmKind::Rotational.to_string(), "Basic Rotation");
    }

    #[test]
    fn test_build_gives_uninitialized_algorithm() {
        for kind in [AlgorithmKind::Rotational, AlgorithmKind::MasteryWeighted] {
            let mut algorithm = kind.build(2, None);
            assert_eq!(algorithm.name(), kind.display_name());
            assert_eq!(algorithm.max_cycles(), 2);
            assert!(algorithm.current_card().is_none());
            assert_eq!(algorithm.move_to_next(), Err(StudyError::EmptyDeck));
            assert!(!algorithm.is_session_complete());
        }
    }

    #[test]
    fn test_state_drops_repeated_cards() {
        let card = Card::new("Q", "A");
        let other = Card::new("Q", "A");
        let mut state = SessionState::new(1);
        state.load(&[card.clone(), other.clone(), card.clone()]);
        assert_eq!(state.cards.len(), 2);
        assert!(state.ensure_known(&other).is_ok());
        assert_eq!(
            state.ensure_known(&Card::new("Q", "A")).map_err(|e| matches!(e, StudyError::UnknownCard(_))),
            Err(true)
        );
    }

    #[test]
    fn test_unbounded_session_never_completes() {
        let mut state = SessionState::new(0);
        state.cycles_completed = 50;
        assert!(!state.is_complete());
        state.max_cycles = -3;
        assert!(!state.is_complete());
        state.max_cycles = 50;
        assert!(state.is_complete());
    }
}
