//! Settings storage
//!
//! Settings are a flat JSON object of named options stored in a single
//! `config.json` file. Consumers receive a [`SharedSettings`] handle rather
//! than reaching for a global instance.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::models::Lookup;

/// Error type for settings operations
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings store is unavailable")]
    Unavailable,
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Key-value store for named options
pub trait SettingsStore {
    /// Look up an option. A missing key is not an error.
    fn lookup(&self, key: &str) -> Lookup<Value>;

    /// Store an option, replacing any previous value
    fn save_option(&mut self, key: &str, value: Value) -> Result<()>;
}

/// Settings handle shared between the session and the algorithms it drives
pub type SharedSettings = Arc<Mutex<dyn SettingsStore + Send>>;

/// Look up an option and deserialize it into `T`
pub fn lookup_as<T, S>(store: &S, key: &str) -> Result<Lookup<T>>
where
    T: DeserializeOwned,
    S: SettingsStore + ?Sized,
{
    match store.lookup(key) {
        Lookup::Found(value) => Ok(Lookup::Found(serde_json::from_value(value)?)),
        Lookup::Missing => Ok(Lookup::Missing),
    }
}

/// Serialize `value` and store it under `key`
pub fn save_as<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
    S: SettingsStore + ?Sized,
{
    store.save_option(key, serde_json::to_value(value)?)
}

/// Settings persisted as a JSON object file
pub struct JsonSettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonSettingsStore {
    /// Open the settings file at `path`.
    ///
    /// A missing file gives an empty store. So does a file that cannot be
    /// read or parsed; the problem is logged and the file is replaced on the
    /// next save.
    pub fn open(path: PathBuf) -> Self {
        let values = Self::load(&path);
        Self { path, values }
    }

    /// Default location: `<config dir>/flashdeck/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flashdeck").join("config.json"))
    }

    /// Wrap this store in a [`SharedSettings`] handle
    pub fn into_shared(self) -> SharedSettings {
        Arc::new(Mutex::new(self))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the settings file, discarding unsaved in-memory state
    pub fn reload(&mut self) {
        self.values = Self::load(&self.path);
    }

    fn load(path: &Path) -> Map<String, Value> {
        if !path.exists() {
            return Map::new();
        }

        let parsed = fs::read_to_string(path)
            .map_err(SettingsError::from)
            .and_then(|content| serde_json::from_str::<Map<String, Value>>(&content).map_err(SettingsError::from));

        match parsed {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Ignoring unreadable settings file {:?}: {}", path, e);
                Map::new()
            }
        }
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn lookup(&self, key: &str) -> Lookup<Value> {
        match self.values.get(key) {
            Some(Value::Null) | None => Lookup::Missing,
            Some(value) => Lookup::Found(value.clone()),
        }
    }

    fn save_option(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.write()?;
        log::debug!("Saved option '{}' to {:?}", key, self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::models::{DeckInfo, Theme, LAST_DECK_KEY, THEME_KEY};
    use tempfile::TempDir;

    fn create_test_store() -> (JsonSettingsStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonSettingsStore::open(temp_dir.path().join("nested").join("config.json"));
        (store, temp_dir)
    }

    #[test]
    fn test_missing_key() {
        let (store, _temp) = create_test_store();
        assert!(store.lookup(LAST_DECK_KEY).is_missing());
        let typed: Lookup<DeckInfo> = lookup_as(&store, LAST_DECK_KEY).unwrap();
        assert!(typed.is_missing());
    }

    #[test]
    fn test_save_and_reopen() {
        let (mut store, _temp) = create_test_store();
        let info = DeckInfo::new("Capitals", "/decks/capitals.json", 4);

        save_as(&mut store, LAST_DECK_KEY, &info).unwrap();
        save_as(&mut store, THEME_KEY, &Theme::Dark).unwrap();

        let reopened = JsonSettingsStore::open(store.path().to_path_buf());
        let loaded: DeckInfo = lookup_as(&reopened, LAST_DECK_KEY).unwrap().found().unwrap();
        assert_eq!(loaded, info);
        assert_eq!(reopened.lookup(THEME_KEY), Lookup::Found(Value::from("dark")));
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let (mut store, _temp) = create_test_store();
        store.save_option(LAST_DECK_KEY, Value::from(42)).unwrap();
        let result: Result<Lookup<DeckInfo>> = lookup_as(&store, LAST_DECK_KEY);
        assert!(matches!(result, Err(SettingsError::Json(_))));
    }

    #[test]
    fn test_corrupt_file_treated_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = JsonSettingsStore::open(path.clone());
        assert!(store.lookup(THEME_KEY).is_missing());

        store.save_option(THEME_KEY, Value::from("light")).unwrap();
        store.reload();
        assert_eq!(store.lookup(THEME_KEY), Lookup::Found(Value::from("light")));
    }
}
