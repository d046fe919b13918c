//! End-to-end tests for the stock typography split.

use keyshift::{
    MemoryStore, MigrateError, MigrationLedger, MigrationRegistry, MigrationRunner,
    MigrationStats, SettingsStore, typography,
};
use serde_json::json;

fn run(store: &mut MemoryStore) -> Result<MigrationStats, MigrateError> {
    let mut registry = MigrationRegistry::new();
    registry.register(typography::migration_set());
    let defaults = typography::defaults();
    MigrationRunner::new(&registry, &defaults).run(store)
}

#[test]
fn customized_site_splits_into_per_element_keys() {
    let mut store = MemoryStore::seeded([
        ("font-site-title", json!("serif")),
        ("font-header", json!("monospace")),
        ("font-header-size", json!(32)),
        ("font-body-size", json!(18)),
    ]);

    let stats = run(&mut store).unwrap();
    assert_eq!(stats.sets_applied, 1);

    // the single header family fans out to all six levels
    assert_eq!(
        store.get("font-family-site-title").unwrap(),
        Some(json!("serif"))
    );
    for level in 1..=6 {
        assert_eq!(
            store.get(&format!("font-family-h{level}")).unwrap(),
            Some(json!("monospace"))
        );
    }

    // header sizes scale relative to the old base size
    assert_eq!(store.get("font-size-h1").unwrap(), Some(json!(32)));
    assert_eq!(store.get("font-size-h2").unwrap(), Some(json!(22))); // 68%
    assert_eq!(store.get("font-size-h6").unwrap(), Some(json!(9))); // 28%

    // plain renames copy the stored value
    assert_eq!(store.get("font-size-body").unwrap(), Some(json!(18)));
    // keys the site never customized migrate their defaults
    assert_eq!(store.get("font-size-nav").unwrap(), Some(json!(14)));
    assert_eq!(store.get("font-family-body").unwrap(), Some(json!("sans-serif")));

    assert!(
        MigrationLedger::load(&store)
            .unwrap()
            .is_applied(typography::TYPOGRAPHY_SPLIT)
    );
}

#[test]
fn already_split_site_is_left_alone() {
    let mut store = MemoryStore::seeded([
        ("font-header-size", json!(40)),
        // configured by hand on the new key
        ("font-size-h1", json!(44)),
    ]);

    let stats = run(&mut store).unwrap();

    assert_eq!(stats.sets_skipped, 1);
    assert_eq!(store.get("font-size-h1").unwrap(), Some(json!(44)));
    assert_eq!(store.get("font-size-h2").unwrap(), None);
    assert!(
        MigrationLedger::load(&store)
            .unwrap()
            .is_applied(typography::TYPOGRAPHY_SPLIT)
    );
}

#[test]
fn sizes_saved_as_strings_still_convert() {
    // sizes entered through the old text controls persist as strings
    let mut store = MemoryStore::seeded([("font-header-size", json!("30"))]);

    run(&mut store).unwrap();

    assert_eq!(store.get("font-size-h3").unwrap(), Some(json!(14))); // 48%
}

#[test]
fn non_numeric_header_size_is_a_transform_error() {
    let mut store = MemoryStore::seeded([("font-header-size", json!(true))]);

    let err = run(&mut store).unwrap_err();

    assert!(matches!(err, MigrateError::Transform { .. }));
}

#[test]
fn fresh_install_records_the_split_without_seeding_keys() {
    let mut store = MemoryStore::new();

    let stats = run(&mut store).unwrap();

    assert_eq!(stats.sets_applied, 0);
    assert_eq!(store.get("font-size-h1").unwrap(), None);
    assert!(
        MigrationLedger::load(&store)
            .unwrap()
            .is_applied(typography::TYPOGRAPHY_SPLIT)
    );
}
