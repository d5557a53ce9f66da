//! Application settings
//!
//! Holds the options that outlive a single run: the last used deck with its
//! mastery snapshot, and the UI theme.

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{lookup_as, save_as, JsonSettingsStore, SettingsError, SettingsStore, SharedSettings};
