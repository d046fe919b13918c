use std::collections::BTreeMap;

use serde_json::Value;

/// Registered fallback values for settings keys.
///
/// When a migration reads an old key that was never customized, the value
/// carried forward is the key's registered default, since the new keys may
/// not share it.
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    entries: BTreeMap<String, Value>,
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the fallback value for `key`, replacing any existing one.
    pub fn register(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.register(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
