//! Data models for application settings

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Settings key holding the [`DeckInfo`] of the most recently used deck
pub const LAST_DECK_KEY: &str = "lastDeck";

/// Settings key holding the selected [`Theme`]
pub const THEME_KEY: &str = "theme";

/// Result of looking up a settings key
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Missing,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::Missing => Lookup::Missing,
        }
    }
}

/// Metadata about a deck the user worked with, stored so a later run can
/// reopen it and pick up its mastery context.
///
/// Mastery levels are keyed by question text because the deck document
/// carries no card identifiers. Cards sharing a question share an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckInfo {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub flashcard_count: usize,
    #[serde(default)]
    pub mastery_levels: HashMap<String, i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_studied: Option<DateTime<Utc>>,
}

impl DeckInfo {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, flashcard_count: usize) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            flashcard_count,
            mastery_levels: HashMap::new(),
            last_studied: None,
        }
    }
}

impl fmt::Display for DeckInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} flashcards)", self.name, self.flashcard_count)
    }
}

/// UI theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}
