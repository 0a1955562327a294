//! Client-side key/value storage (browser `localStorage`).

use rustc_hash::FxHashMap;

use crate::error::PanelError;

/// The consumed storage interface.
pub trait KeyValueStore {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PanelError>;
}

/// In-memory store for tests and headless hosts.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PanelError> {
        let _ = self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Read a boolean flag written by [`store_flag`]. Only the exact string
/// `"true"` counts as set.
pub fn load_flag<K: KeyValueStore + ?Sized>(store: &K, key: &str) -> bool {
    store.get(key).as_deref() == Some("true")
}

/// Persist a boolean flag as `"true"` / `"false"`.
pub fn store_flag<K: KeyValueStore + ?Sized>(
    store: &mut K,
    key: &str,
    value: bool,
) -> Result<(), PanelError> {
    store.set(key, if value { "true" } else { "false" })
}
