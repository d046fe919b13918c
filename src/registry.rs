use serde_json::Value;

use crate::errors::MigrateError;
use crate::store::SettingsStore;

/// Transform override: computes and writes the new keys' values itself
/// instead of the default copy behavior.
///
/// The transform receives the old key's value (stored or default), the
/// rule's new keys, and the store to write into.
pub type TransformFn = fn(&Value, &[String], &mut dyn SettingsStore) -> Result<(), MigrateError>;

/// How a rule turns the old value into new entries.
#[derive(Debug, Clone, Copy)]
pub enum RuleAction {
    /// Write the old value unchanged into every new key.
    Copy,
    /// Hand the old value and the new keys to a transform, which writes
    /// into the store directly.
    Transform(TransformFn),
}

/// A single key-rename rule: one legacy key feeding one or more new keys.
#[derive(Debug, Clone)]
pub struct Rule {
    pub old_key: String,
    pub new_keys: Vec<String>,
    pub action: RuleAction,
}

impl Rule {
    /// Rule that copies the old value into every new key.
    pub fn copy<K, I>(old_key: impl Into<String>, new_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            old_key: old_key.into(),
            new_keys: new_keys.into_iter().map(Into::into).collect(),
            action: RuleAction::Copy,
        }
    }

    /// Rule whose transform writes the new keys itself.
    pub fn transform<K, I>(old_key: impl Into<String>, new_keys: I, transform: TransformFn) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            old_key: old_key.into(),
            new_keys: new_keys.into_iter().map(Into::into).collect(),
            action: RuleAction::Transform(transform),
        }
    }
}

/// A versioned batch of rules applied exactly once.
///
/// Version labels are opaque identity tokens; the engine never parses or
/// sorts them.
#[derive(Debug, Clone)]
pub struct MigrationSet {
    pub version: String,
    pub rules: Vec<Rule>,
}

impl MigrationSet {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            rules: Vec::new(),
        }
    }

    /// Builder-style rule append.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Every new key this set introduces, with fan-outs flattened.
    pub fn new_keys(&self) -> Vec<&str> {
        self.rules
            .iter()
            .flat_map(|rule| rule.new_keys.iter().map(String::as_str))
            .collect()
    }
}

/// Ordered collection of migration sets.
///
/// Registration order is application order. Hosts and third parties
/// register their sets before the engine runs; registering a version that
/// already exists appends the new rules to that set.
#[derive(Debug, Clone, Default)]
pub struct MigrationRegistry {
    sets: Vec<MigrationSet>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, set: MigrationSet) -> &mut Self {
        match self.sets.iter_mut().find(|s| s.version == set.version) {
            Some(existing) => existing.rules.extend(set.rules),
            None => self.sets.push(set),
        }
        self
    }

    /// Attach an action override to an already-registered rule, addressed by
    /// `(version, old_key)`. Returns false when no such rule exists.
    pub fn override_action(&mut self, version: &str, old_key: &str, action: RuleAction) -> bool {
        let Some(set) = self.sets.iter_mut().find(|s| s.version == version) else {
            return false;
        };
        let Some(rule) = set.rules.iter_mut().find(|r| r.old_key == old_key) else {
            return false;
        };
        rule.action = action;
        true
    }

    pub fn get(&self, version: &str) -> Option<&MigrationSet> {
        self.sets.iter().find(|s| s.version == version)
    }

    /// Registered sets in registration order.
    pub fn sets(&self) -> &[MigrationSet] {
        &self.sets
    }

    /// Registered version labels in registration order.
    pub fn versions(&self) -> Vec<&str> {
        self.sets.iter().map(|s| s.version.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }
}
