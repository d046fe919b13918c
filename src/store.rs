use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::StoreError;

/// Read/write access to the host's persisted settings.
///
/// The engine never owns the settings; hosts hand it whatever implements
/// this trait. [`MemoryStore`] below is both the reference implementation
/// and the test double.
pub trait SettingsStore {
    /// Current value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, creating the entry if needed.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Snapshot of every persisted entry.
    ///
    /// Returns `None` when no settings were ever saved (a fresh
    /// installation), which is distinct from `Some` of an empty map.
    fn all(&self) -> Result<Option<BTreeMap<String, Value>>, StoreError>;
}

/// In-memory settings store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Option<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Create a store in the fresh-install state: no settings ever saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries.
    pub fn seeded<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            entries: Some(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.as_ref().and_then(|map| map.get(key).cloned()))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value);
        Ok(())
    }

    fn all(&self) -> Result<Option<BTreeMap<String, Value>>, StoreError> {
        Ok(self.entries.clone())
    }
}
