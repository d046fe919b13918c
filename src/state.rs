//! Migration state tracking in the settings store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MigrateError;
use crate::store::SettingsStore;

/// Key under which the migrated-version record is persisted, alongside the
/// settings it governs.
pub const MIGRATION_STATE_KEY: &str = "_keyshift:migrated";

/// Applied migration record.
///
/// Membership is judged on `version` alone; a set skipped by the collision
/// guard gets the same record as one that ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedMigration {
    /// Migration set version label (e.g., "1.3.0")
    pub version: String,
    /// When the set was recorded as done
    pub applied_at: DateTime<Utc>,
}

/// In-memory view of the persisted migrated-version record.
#[derive(Debug, Clone, Default)]
pub struct MigrationLedger {
    applied: Vec<AppliedMigration>,
}

impl MigrationLedger {
    /// Load the record from the store.
    ///
    /// A missing record is an empty ledger; a present but unreadable one is
    /// an error.
    pub fn load(store: &dyn SettingsStore) -> Result<Self, MigrateError> {
        let applied = match store.get(MIGRATION_STATE_KEY)? {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };
        Ok(Self { applied })
    }

    /// Check whether a version has been recorded.
    pub fn is_applied(&self, version: &str) -> bool {
        self.applied.iter().any(|m| m.version == version)
    }

    /// Record a version as done. Recording the same version twice keeps the
    /// first entry.
    pub fn record(&mut self, version: &str) {
        if !self.is_applied(version) {
            self.applied.push(AppliedMigration {
                version: version.to_string(),
                applied_at: Utc::now(),
            });
        }
    }

    /// Remove a version's record so the engine will attempt it again.
    ///
    /// This is the manual escape hatch for a set the collision guard
    /// foreclosed. Returns false when the version was not recorded.
    pub fn remove(&mut self, version: &str) -> bool {
        let before = self.applied.len();
        self.applied.retain(|m| m.version != version);
        self.applied.len() != before
    }

    /// All recorded version labels, oldest first.
    pub fn versions(&self) -> Vec<&str> {
        self.applied.iter().map(|m| m.version.as_str()).collect()
    }

    pub fn records(&self) -> &[AppliedMigration] {
        &self.applied
    }

    /// Write the record back under [`MIGRATION_STATE_KEY`].
    pub fn persist(&self, store: &mut dyn SettingsStore) -> Result<(), MigrateError> {
        let value: Value = serde_json::to_value(&self.applied)?;
        store.set(MIGRATION_STATE_KEY, value)?;
        Ok(())
    }
}
