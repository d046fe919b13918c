//! Migration runner for executing pending migration sets.

use std::time::Instant;

use log::{debug, info, warn};

use crate::defaults::Defaults;
use crate::errors::MigrateError;
use crate::registry::{MigrationRegistry, MigrationSet, Rule, RuleAction};
use crate::state::MigrationLedger;
use crate::store::SettingsStore;

/// Statistics from a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStats {
    /// Sets whose rules ran
    pub sets_applied: u32,
    /// Sets skipped because a new key already existed
    pub sets_skipped: u32,
    /// Rules that produced writes (a transform counts as one)
    pub rules_applied: u32,
    /// Total execution time in milliseconds
    pub total_time_ms: u64,
}

/// Applies registered migration sets to a settings store, once each.
///
/// Safe to invoke on every host startup: versions already in the persisted
/// record are never re-applied.
pub struct MigrationRunner<'a> {
    registry: &'a MigrationRegistry,
    defaults: &'a Defaults,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(registry: &'a MigrationRegistry, defaults: &'a Defaults) -> Self {
        Self { registry, defaults }
    }

    /// Run every pending migration set against `store`.
    pub fn run(&self, store: &mut dyn SettingsStore) -> Result<MigrationStats, MigrateError> {
        let start = Instant::now();
        let mut stats = MigrationStats::default();

        let mut ledger = MigrationLedger::load(store)?;

        let pending: Vec<&MigrationSet> = self
            .registry
            .sets()
            .iter()
            .filter(|set| !ledger.is_applied(&set.version))
            .collect();

        if pending.is_empty() {
            debug!("no pending migration sets");
            return Ok(stats);
        }

        // A fresh installation has nothing to rewrite: mark every known set
        // as done without touching any values.
        let Some(snapshot) = store.all()? else {
            for set in self.registry.sets() {
                ledger.record(&set.version);
            }
            ledger.persist(store)?;
            info!(
                "fresh install, {} migration set(s) marked done",
                self.registry.len()
            );
            stats.total_time_ms = start.elapsed().as_millis() as u64;
            return Ok(stats);
        };

        for set in pending {
            // The guard compares against the snapshot taken before this
            // loop, so keys written by an earlier set in the same pass are
            // invisible to later guards.
            let collision = set.new_keys().iter().any(|key| snapshot.contains_key(*key));

            if collision {
                warn!(
                    "skipping migration set '{}': new keys already present",
                    set.version
                );
                stats.sets_skipped += 1;
            } else {
                for rule in &set.rules {
                    if self.apply_rule(store, rule)? {
                        stats.rules_applied += 1;
                    }
                }
                info!(
                    "applied migration set '{}' ({} rule(s))",
                    set.version,
                    set.rules.len()
                );
                stats.sets_applied += 1;
            }

            // Skipped or applied, the set is done; a collision forecloses
            // it until the record is cleared by hand.
            ledger.record(&set.version);
        }

        ledger.persist(store)?;
        stats.total_time_ms = start.elapsed().as_millis() as u64;

        Ok(stats)
    }

    /// Apply one rule. Returns false when there was no value to carry over.
    fn apply_rule(
        &self,
        store: &mut dyn SettingsStore,
        rule: &Rule,
    ) -> Result<bool, MigrateError> {
        // The new keys may not share the old key's default, so an
        // uncustomized value still migrates as the registered default.
        let value = match store.get(&rule.old_key)? {
            Some(value) => value,
            None => match self.defaults.get(&rule.old_key) {
                Some(default) => default.clone(),
                None => {
                    debug!(
                        "'{}' unset with no registered default, nothing to migrate",
                        rule.old_key
                    );
                    return Ok(false);
                }
            },
        };

        match rule.action {
            RuleAction::Copy => {
                for key in &rule.new_keys {
                    store.set(key, value.clone())?;
                }
            }
            RuleAction::Transform(transform) => {
                transform(&value, &rule.new_keys, store)?;
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_migration_stats_default() {
        let stats = MigrationStats::default();
        assert_eq!(stats.sets_applied, 0);
        assert_eq!(stats.sets_skipped, 0);
        assert_eq!(stats.rules_applied, 0);
        assert_eq!(stats.total_time_ms, 0);
    }

    #[test]
    fn test_empty_registry_is_a_noop() {
        let registry = MigrationRegistry::new();
        let defaults = Defaults::new();
        let mut store = MemoryStore::seeded([("color", "red")]);

        let stats = MigrationRunner::new(&registry, &defaults)
            .run(&mut store)
            .unwrap();

        assert_eq!(stats, MigrationStats::default());
        // the fast path does not even write a record
        assert_eq!(store.all().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_sets_apply_in_registration_order() {
        // "9.0" registered first must run first: labels are opaque tokens,
        // never sorted. Its write feeds the second set's rule.
        let mut registry = MigrationRegistry::new();
        registry.register(MigrationSet::new("9.0").rule(Rule::copy("a", ["b"])));
        registry.register(MigrationSet::new("1.0").rule(Rule::copy("b", ["c"])));
        let defaults = Defaults::new();
        let mut store = MemoryStore::seeded([("a", 1)]);

        let stats = MigrationRunner::new(&registry, &defaults)
            .run(&mut store)
            .unwrap();

        assert_eq!(stats.sets_applied, 2);
        assert_eq!(store.get("c").unwrap(), Some(json!(1)));
    }
}
