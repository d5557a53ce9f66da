//! Mastery-weighted study policy
//!
//! Each card carries an integer level: +1 for a correct answer, -1 for an
//! incorrect one, never below 0. When a cycle closes the working set is
//! reordered by ascending `(level, last reviewed cycle)` so the weakest cards
//! come first, and the position goes back to the start. Within a tie the card
//! answered last in the closing cycle comes first.
//!
//! After every accepted answer the policy writes a question -> level snapshot
//! into the `lastDeck` settings record, if there is one.

use std::cmp::Reverse;
use std::collections::HashMap;

use super::algorithm::{Result, SessionState, SnapshotError, StudyAlgorithm};
use crate::flashcards::{Card, CardId};
use crate::settings::{lookup_as, save_as, DeckInfo, Lookup, SettingsError, SharedSettings, LAST_DECK_KEY};

#[derive(Debug, Clone, Copy)]
struct Progress {
    level: i32,
    /// Cycle of the latest answer, -1 if never answered
    last_reviewed_cycle: i64,
    /// Global answer sequence number of the latest answer
    last_review: u64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            level: 0,
            last_reviewed_cycle: -1,
            last_review: 0,
        }
    }
}

pub struct MasteryWeightedAlgorithm {
    state: SessionState,
    progress: HashMap<CardId, Progress>,
    reviews: u64,
    settings: Option<SharedSettings>,
}

impl MasteryWeightedAlgorithm {
    pub fn new(max_cycles: i32) -> Self {
        Self {
            state: SessionState::new(max_cycles),
            progress: HashMap::new(),
            reviews: 0,
            settings: None,
        }
    }

    /// Keep the `lastDeck` record's mastery levels in `settings` up to date
    pub fn with_settings(mut self, settings: SharedSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Numeric level of a card
    pub fn level(&self, card: &Card) -> Result<i32> {
        self.state.ensure_known(card)?;
        Ok(self.progress.get(&card.id()).map_or(0, |p| p.level))
    }

    fn close_cycle(&mut self) {
        self.state.cycles_completed += 1;
        self.state.answered.clear();

        let progress = &self.progress;
        self.state.cards.sort_by_key(|card| {
            let p = progress.get(&card.id()).copied().unwrap_or_default();
            (p.level, p.last_reviewed_cycle, Reverse(p.last_review))
        });
        self.state.current_index = 0;

        log::debug!(
            "Completed cycle {}, next order: {:?}",
            self.state.cycles_completed,
            self.state.cards.iter().map(|c| c.question.as_str()).collect::<Vec<_>>()
        );
    }

    fn persist_snapshot(&self) -> std::result::Result<(), SnapshotError> {
        let settings = self.settings.as_ref().ok_or(SnapshotError::PersistenceUnavailable)?;
        let mut store = settings
            .lock()
            .map_err(|_| SnapshotError::Settings(SettingsError::Unavailable))?;

        let mut info: DeckInfo = match lookup_as(&*store, LAST_DECK_KEY)? {
            Lookup::Found(info) => info,
            Lookup::Missing => return Err(SnapshotError::PersistenceUnavailable),
        };
        info.mastery_levels = self.mastery_snapshot();
        save_as(&mut *store, LAST_DECK_KEY, &info)?;
        Ok(())
    }
}

impl StudyAlgorithm for MasteryWeightedAlgorithm {
    fn name(&self) -> &'static str {
        "Spaced Repetition"
    }

    fn initialize(&mut self, cards: &[Card]) {
        self.state.load(cards);
        self.progress = self
            .state
            .cards
            .iter()
            .map(|card| (card.id(), Progress::default()))
            .collect();
        self.reviews = 0;
    }

    fn record_response(&mut self, card: &Card, is_correct: bool) -> Result<()> {
        self.state.ensure_known(card)?;
        if !self.state.answered.insert(card.id()) {
            log::debug!("Ignoring repeated answer for card {} in this cycle", card.id());
            return Ok(());
        }

        self.reviews += 1;
        let cycle = self.state.cycles_completed as i64;
        let progress = self.progress.entry(card.id()).or_default();
        progress.level = if is_correct {
            progress.level + 1
        } else {
            (progress.level - 1).max(0)
        };
        progress.last_reviewed_cycle = cycle;
        progress.last_review = self.reviews;
        self.state.tally(is_correct);

        if self.state.all_answered() {
            self.close_cycle();
        }

        match self.persist_snapshot() {
            Ok(()) => {}
            Err(SnapshotError::PersistenceUnavailable) => {
                log::debug!("No deck metadata yet, mastery snapshot not saved");
            }
            Err(e) => log::warn!("Failed to save mastery snapshot: {}", e),
        }
        Ok(())
    }

    fn move_to_next(&mut self) -> Result<bool> {
        self.state.ensure_not_empty()?;
        if self.state.all_answered() {
            return Ok(false);
        }
        self.state.current_index = self.state.next_index();
        Ok(true)
    }

    fn move_to_previous(&mut self) -> Result<bool> {
        self.state.ensure_not_empty()?;
        if self.state.all_answered() {
            return Ok(false);
        }
        self.state.current_index = self.state.previous_index();
        Ok(true)
    }

    fn current_card(&self) -> Option<&Card> {
        self.state.current_card()
    }

    fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// True at the start of a cycle, before any card has been answered
    fn is_first_card(&self) -> bool {
        !self.state.cards.is_empty() && self.state.answered.is_empty()
    }

    fn is_session_complete(&self) -> bool {
        self.state.is_complete()
    }

    fn has_answered_this_cycle(&self, card: &Card) -> bool {
        self.state.answered.contains(&card.id())
    }

    fn mastery_level(&self, card: &Card) -> Result<String> {
        Ok(format!("Level {}", self.level(card)?))
    }

    fn mastery_snapshot(&self) -> HashMap<String, i32> {
        self.state
            .cards
            .iter()
            .map(|card| {
                let level = self.progress.get(&card.id()).map_or(0, |p| p.level);
                (card.question.clone(), level)
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
        for progress in self.progress.values_mut() {
            *progress = Progress::default();
        }
        self.reviews = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{JsonSettingsStore, SettingsStore};
    use crate::study::algorithm::StudyError;
    use tempfile::TempDir;

    fn abc() -> Vec<Card> {
        vec![
            Card::new("A?", "A"),
            Card::new("B?", "B"),
            Card::new("C?", "C"),
        ]
    }

    fn started(cards: &[Card], max_cycles: i32) -> MasteryWeightedAlgorithm {
        let mut algorithm = MasteryWeightedAlgorithm::new(max_cycles);
        algorithm.initialize(cards);
        algorithm
    }

    fn questions(algorithm: &MasteryWeightedAlgorithm) -> Vec<&str> {
        algorithm.working_set().iter().map(|c| c.question.as_str()).collect()
    }

    #[test]
    fn test_cycle_reorders_weakest_first() {
        let cards = abc();
        let mut algorithm = started(&cards, 2);

        algorithm.record_response(&cards[0], true).unwrap();
        algorithm.move_to_next().unwrap();
        algorithm.record_response(&cards[1], false).unwrap();
        algorithm.move_to_next().unwrap();
        algorithm.record_response(&cards[2], false).unwrap();

        assert_eq!(algorithm.level(&cards[0]).unwrap(), 1);
        assert_eq!(algorithm.level(&cards[1]).unwrap(), 0);
        assert_eq!(algorithm.level(&cards[2]).unwrap(), 0);

        assert_eq!(questions(&algorithm), vec!["C?", "B?", "A?"]);
        assert_eq!(algorithm.current_index(), 0);
        assert!(algorithm.current_card().unwrap().is_same_card(&cards[2]));
        assert_eq!(algorithm.cycles_completed(), 1);
        assert!(!algorithm.is_session_complete());
    }

    #[test]
    fn test_cycle_close_clears_answers_and_reopens_movement() {
        let cards = abc();
        let mut algorithm = started(&cards, 0);

        for card in &cards {
            algorithm.record_response(card, true).unwrap();
        }

        assert_eq!(algorithm.cycles_completed(), 1);
        assert!(cards.iter().all(|c| !algorithm.has_answered_this_cycle(c)));
        assert!(algorithm.is_first_card());
        assert!(algorithm.move_to_next().unwrap());
    }

    #[test]
    fn test_movement_blocked_when_every_card_answered() {
        let cards = abc();
        let mut algorithm = started(&cards, 0);
        // Only reachable through the shared state; cycle closing normally
        // clears the answered set straight away.
        for card in &cards {
            algorithm.state.answered.insert(card.id());
        }
        assert_eq!(algorithm.move_to_next(), Ok(false));
        assert_eq!(algorithm.move_to_previous(), Ok(false));
        assert_eq!(algorithm.current_index(), 0);
    }

    #[test]
    fn test_repeated_answer_is_ignored() {
        let cards = abc();
        let mut algorithm = started(&cards, 0);

        algorithm.record_response(&cards[1], true).unwrap();
        algorithm.record_response(&cards[1], true).unwrap();
        algorithm.record_response(&cards[1], false).unwrap();

        assert_eq!(algorithm.total_correct(), 1);
        assert_eq!(algorithm.total_incorrect(), 0);
        assert_eq!(algorithm.mastery_level(&cards[1]).unwrap(), "Level 1");
    }

    #[test]
    fn test_level_floors_at_zero() {
        let cards = vec![Card::new("Only?", "Yes")];
        let mut algorithm = started(&cards, 0);

        algorithm.record_response(&cards[0], false).unwrap();
        algorithm.record_response(&cards[0], false).unwrap();
        assert_eq!(algorithm.mastery_level(&cards[0]).unwrap(), "Level 0");
        algorithm.record_response(&cards[0], true).unwrap();
        assert_eq!(algorithm.mastery_level(&cards[0]).unwrap(), "Level 1");
        assert_eq!(algorithm.cycles_completed(), 3);
    }

    #[test]
    fn test_session_completion() {
        let cards = abc();
        let mut algorithm = started(&cards, 1);
        assert!(algorithm.is_first_card());
        for card in &cards {
            assert!(!algorithm.is_session_complete());
            algorithm.record_response(card, true).unwrap();
        }
        assert!(algorithm.is_session_complete());

        let mut unbounded = started(&cards, 0);
        for _ in 0..5 {
            for card in &cards {
                unbounded.record_response(card, true).unwrap();
            }
        }
        assert_eq!(unbounded.cycles_completed(), 5);
        assert!(!unbounded.is_session_complete());
    }

    #[test]
    fn test_reset_restores_initial_order() {
        let cards = abc();
        let mut algorithm = started(&cards, 2);
        algorithm.record_response(&cards[0], true).unwrap();
        algorithm.record_response(&cards[1], true).unwrap();
        algorithm.record_response(&cards[2], false).unwrap();
        assert_eq!(questions(&algorithm), vec!["C?", "B?", "A?"]);

        algorithm.reset_session();
        assert_eq!(questions(&algorithm), vec!["A?", "B?", "C?"]);
        assert_eq!(algorithm.cycles_completed(), 0);
        assert_eq!(algorithm.total_correct(), 0);
        assert_eq!(algorithm.total_incorrect(), 0);
        assert_eq!(algorithm.mastery_level(&cards[0]).unwrap(), "Level 0");
    }

    #[test]
    fn test_unknown_card_and_empty_deck() {
        let mut algorithm = started(&abc(), 1);
        let stranger = Card::new("A?", "A");
        assert_eq!(
            algorithm.record_response(&stranger, true),
            Err(StudyError::UnknownCard(stranger.id()))
        );

        let mut empty = started(&[], 1);
        assert!(empty.current_card().is_none());
        assert_eq!(empty.move_to_next(), Err(StudyError::EmptyDeck));
        assert_eq!(empty.move_to_previous(), Err(StudyError::EmptyDeck));
    }

    #[test]
    fn test_snapshot_written_to_last_deck() {
        let temp = TempDir::new().unwrap();
        let mut store = JsonSettingsStore::open(temp.path().join("config.json"));
        save_as(&mut store, LAST_DECK_KEY, &DeckInfo::new("Letters", "/decks/letters.json", 3)).unwrap();
        let settings = store.into_shared();

        let cards = abc();
        let mut algorithm = started(&cards, 0).with_settings(settings.clone());
        algorithm.record_response(&cards[0], true).unwrap();
        algorithm.record_response(&cards[1], false).unwrap();

        let guard = settings.lock().unwrap();
        let info: DeckInfo = lookup_as(&*guard, LAST_DECK_KEY).unwrap().found().unwrap();
        assert_eq!(info.name, "Letters");
        assert_eq!(info.mastery_levels["A?"], 1);
        assert_eq!(info.mastery_levels["B?"], 0);
        assert_eq!(info.mastery_levels["C?"], 0);
    }

    #[test]
    fn test_missing_metadata_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let settings = JsonSettingsStore::open(temp.path().join("config.json")).into_shared();

        let cards = abc();
        let mut algorithm = started(&cards, 0).with_settings(settings.clone());
        algorithm.record_response(&cards[0], true).unwrap();

        assert!(settings.lock().unwrap().lookup(LAST_DECK_KEY).is_missing());
        assert_eq!(algorithm.total_correct(), 1);
    }
}
