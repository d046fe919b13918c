//! KeyShift core library.
//!
//! A versioned settings-migration engine for flat key-value settings
//! stores. Hosts register rename/fan-out rule sets against version labels,
//! point the runner at their persisted settings, and each set is applied
//! exactly once; completion is recorded under a well-known key in the same
//! store, so the runner is safe to call on every startup.
//!
//! ```
//! use keyshift::{MemoryStore, MigrationRegistry, MigrationRunner, typography};
//!
//! let mut registry = MigrationRegistry::new();
//! registry.register(typography::migration_set());
//!
//! let mut store = MemoryStore::seeded([("font-header-size", 32)]);
//! let stats = MigrationRunner::new(&registry, &typography::defaults())
//!     .run(&mut store)
//!     .unwrap();
//! assert_eq!(stats.sets_applied, 1);
//! ```

pub mod defaults;
pub mod errors;
pub mod registry;
pub mod runner;
pub mod state;
pub mod store;
pub mod typography;

pub use defaults::Defaults;
pub use errors::{MigrateError, StoreError};
pub use registry::{MigrationRegistry, MigrationSet, Rule, RuleAction, TransformFn};
pub use runner::{MigrationRunner, MigrationStats};
pub use state::{AppliedMigration, MIGRATION_STATE_KEY, MigrationLedger};
pub use store::{MemoryStore, SettingsStore};
