//! Durable key/value storage for client state.
//!
//! Two entries are kept: the visibility map and the search history, each as a
//! JSON document. A missing or unparseable entry loads as its empty default.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

pub const VISIBILITY_KEY: &str = "provider-visibility";
pub const HISTORY_KEY: &str = "search-history";

/// String key/value storage.
pub trait StateStore {
    /// Returns the stored text for `key`, or `None` when absent or unreadable.
    fn read(&self, key: &str) -> Option<String>;

    /// Replaces the stored text for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the value cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Loads and deserializes `key`, substituting the default on any failure.
pub fn load_entry<T>(store: &impl StateStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.read(key) else {
        return T::default();
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding corrupt state entry");
            T::default()
        }
    }
}

/// Serializes `value` and writes it under `key`.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization or the write fails.
pub fn save_entry<T>(store: &impl StateStore, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.write(key, &raw)
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for FileStateStore {
    fn read(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, path = %path.display(), error = %e, "unreadable state entry");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            path: path.display().to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Entries are replaced whole via a sibling temp file.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;

        tracing::debug!(key, path = %path.display(), "state entry saved");
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStateStore {
    /// Seeds `key` with raw text, bypassing serialization.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl StateStore for MemoryStateStore {
    fn read(&self, key: &str) -> Option<String> {
        self.raw(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.insert_raw(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::SearchHistory;
    use crate::visibility::{Visibility, VisibilityMap};

    #[test]
    fn missing_entry_loads_default() {
        let store = MemoryStateStore::default();
        let map: VisibilityMap = load_entry(&store, VISIBILITY_KEY);
        assert!(map.is_empty());
    }

    #[test]
    fn corrupt_entry_loads_default() {
        let store = MemoryStateStore::default();
        store.insert_raw(VISIBILITY_KEY, "{not json");
        store.insert_raw(HISTORY_KEY, r#"{"wrong":"shape"}"#);

        let map: VisibilityMap = load_entry(&store, VISIBILITY_KEY);
        let history: SearchHistory = load_entry(&store, HISTORY_KEY);
        assert!(map.is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn unknown_visibility_value_loads_default() {
        let store = MemoryStateStore::default();
        store.insert_raw(VISIBILITY_KEY, r#"{"Acme Rehab":"favourite"}"#);
        let map: VisibilityMap = load_entry(&store, VISIBILITY_KEY);
        assert!(map.is_empty());
    }

    #[test]
    fn file_store_round_trips_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state"));

        let mut map = VisibilityMap::default();
        map.cycle("Acme Rehab");
        save_entry(&store, VISIBILITY_KEY, &map).unwrap();

        let loaded: VisibilityMap = load_entry(&store, VISIBILITY_KEY);
        assert_eq!(loaded.get("Acme Rehab"), Visibility::Highlighted);
        assert!(dir.path().join("state/provider-visibility.json").exists());
        assert!(!dir.path().join("state/.provider-visibility.json.tmp").exists());
    }

    #[test]
    fn file_store_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("search-history.json"), b"\x00\x01garbage").unwrap();

        let store = FileStateStore::new(dir.path());
        let history: SearchHistory = load_entry(&store, HISTORY_KEY);
        assert!(history.is_empty());
    }
}
