//! Rotational study policy
//!
//! Cards are shown in deck order and the position wraps around in both
//! directions. Movement is never blocked, so a user can flip through cards
//! whether or not they were answered. Mastery is the share of correct
//! answers over all attempts.

use std::collections::HashMap;

use super::algorithm::{Result, SessionState, StudyAlgorithm};
use crate::flashcards::{Card, CardId};

#[derive(Debug, Default, Clone, Copy)]
struct Attempts {
    correct: u32,
    attempts: u32,
}

pub struct RotationalAlgorithm {
    state: SessionState,
    mastery: HashMap<CardId, Attempts>,
}

impl RotationalAlgorithm {
    pub fn new(max_cycles: i32) -> Self {
        Self {
            state: SessionState::new(max_cycles),
            mastery: HashMap::new(),
        }
    }

    /// Advance one position (wrapping) and return the new index
    pub fn next_card_index(&mut self) -> Result<usize> {
        self.state.ensure_not_empty()?;
        self.state.current_index = self.state.next_index();
        Ok(self.state.current_index)
    }

    /// Step back one position (wrapping) and return the new index
    pub fn previous_card_index(&mut self) -> Result<usize> {
        self.state.ensure_not_empty()?;
        self.state.current_index = self.state.previous_index();
        Ok(self.state.current_index)
    }
}

impl StudyAlgorithm for RotationalAlgorithm {
    fn name(&self) -> &'static str {
        "Basic Rotation"
    }

    fn initialize(&mut self, cards: &[Card]) {
        self.state.load(cards);
        self.mastery = self
            .state
            .cards
            .iter()
            .map(|card| (card.id(), Attempts::default()))
            .collect();
    }

    fn record_response(&mut self, card: &Card, is_correct: bool) -> Result<()> {
        self.state.ensure_known(card)?;
        if !self.state.answered.insert(card.id()) {
            log::debug!("Ignoring repeated answer for card {} in this cycle", card.id());
            return Ok(());
        }

        let stats = self.mastery.entry(card.id()).or_default();
        stats.attempts += 1;
        if is_correct {
            stats.correct += 1;
        }
        self.state.tally(is_correct);

        if self.state.all_answered() {
            self.state.cycles_completed += 1;
            self.state.answered.clear();
            log::debug!("Completed cycle {}", self.state.cycles_completed);
        }
        Ok(())
    }

    fn move_to_next(&mut self) -> Result<bool> {
        self.next_card_index().map(|_| true)
    }

    fn move_to_previous(&mut self) -> Result<bool> {
        self.previous_card_index().map(|_| true)
    }

    fn current_card(&self) -> Option<&Card> {
        self.state.current_card()
    }

    fn current_index(&self) -> usize {
        self.state.current_index
    }

    fn is_first_card(&self) -> bool {
        !self.state.cards.is_empty() && self.state.current_index == 0
    }

    fn is_session_complete(&self) -> bool {
        self.state.is_complete()
    }

    fn has_answered_this_cycle(&self, card: &Card) -> bool {
        self.state.answered.contains(&card.id())
    }

    fn mastery_level(&self, card: &Card) -> Result<String> {
        self.state.ensure_known(card)?;
        let stats = self.mastery.get(&card.id()).copied().unwrap_or_default();
        if stats.attempts == 0 {
            return Ok("Unattempted".to_string());
        }
        let percentage = stats.correct as f64 / stats.attempts as f64 * 100.0;
        Ok(format!("{:.2}%", percentage))
    }

    fn mastery_snapshot(&self) -> HashMap<String, i32> {
        self.state
            .cards
            .iter()
            .map(|card| {
                let correct = self.mastery.get(&card.id()).map_or(0, |s| s.correct);
                (card.question.clone(), correct as i32)
            })
            .collect()
    }

    fn total_correct(&self) -> u32 {
        self.state.total_correct
    }

    fn total_incorrect(&self) -> u32 {
        self.state.total_incorrect
    }

    fn cycles_completed(&self) -> u32 {
        self.state.cycles_completed
    }

    fn max_cycles(&self) -> i32 {
        self.state.max_cycles
    }

    fn working_set(&self) -> &[Card] {
        &self.state.cards
    }

    fn reset_session(&mut self) {
        self.state.reset();
        for stats in self.mastery.values_mut() {
            *stats = Attempts::default();
        }
    }
}
