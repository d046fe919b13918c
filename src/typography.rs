//! Stock migration set for the typography settings split.
//!
//! Older releases stored a single font family and size for all headings and
//! one family each for the site title and body. Newer releases give every
//! element its own `font-family-*` / `font-size-*` key. This module carries
//! the rename table, the header-size fan-out, and the legacy defaults.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};

use crate::defaults::Defaults;
use crate::errors::MigrateError;
use crate::registry::{MigrationSet, Rule};
use crate::store::SettingsStore;

/// Version label of the typography split.
pub const TYPOGRAPHY_SPLIT: &str = "1.3.0";

/// Heading sizes relative to the legacy base header size, in percent.
static RELATIVE_SIZES: Lazy<BTreeMap<&'static str, f64>> = Lazy::new(|| {
    BTreeMap::from([
        ("h1", 100.0),
        ("h2", 68.0),
        ("h3", 48.0),
        ("h4", 48.0),
        ("h5", 32.0),
        ("h6", 28.0),
    ])
});

static HEADING_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"font-size-(h\d)$").expect("heading key pattern"));

/// Scale `base` by `percent`, rounding half away from zero.
pub fn relative_font_size(base: f64, percent: f64) -> i64 {
    (base * percent / 100.0).round() as i64
}

/// Derive per-heading sizes from the legacy base header size.
///
/// Each new key names its heading level (`font-size-h2`); the level selects
/// the percentage applied to the old value.
fn header_sizes(
    value: &Value,
    new_keys: &[String],
    store: &mut dyn SettingsStore,
) -> Result<(), MigrateError> {
    let base = numeric(value).ok_or_else(|| MigrateError::Transform {
        key: "font-header-size".to_string(),
        message: format!("expected a numeric size, got {value}").into(),
    })?;

    for key in new_keys {
        let Some(caps) = HEADING_KEY.captures(key) else {
            continue;
        };
        if let Some(percent) = RELATIVE_SIZES.get(&caps[1]) {
            store.set(key, json!(relative_font_size(base, *percent)))?;
        }
    }

    Ok(())
}

/// Numeric reading of a stored size, whether saved as a number or a string.
///
/// Sizes entered through the old text controls persist as strings.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The typography split: family/size renames plus the header fan-outs.
pub fn migration_set() -> MigrationSet {
    MigrationSet::new(TYPOGRAPHY_SPLIT)
        .rule(Rule::copy("font-site-title", ["font-family-site-title"]))
        .rule(Rule::copy(
            "font-header",
            [
                "font-family-h1",
                "font-family-h2",
                "font-family-h3",
                "font-family-h4",
                "font-family-h5",
                "font-family-h6",
            ],
        ))
        .rule(Rule::copy("font-body", ["font-family-body"]))
        .rule(Rule::copy("font-site-title-size", ["font-size-site-title"]))
        .rule(Rule::copy(
            "font-site-tagline-size",
            ["font-size-site-tagline"],
        ))
        .rule(Rule::copy("font-nav-size", ["font-size-nav"]))
        .rule(Rule::transform(
            "font-header-size",
            [
                "font-size-h1",
                "font-size-h2",
                "font-size-h3",
                "font-size-h4",
                "font-size-h5",
                "font-size-h6",
            ],
            header_sizes,
        ))
        .rule(Rule::copy("font-widget-size", ["font-size-widget"]))
        .rule(Rule::copy("font-body-size", ["font-size-body"]))
}

/// Defaults for the legacy typography keys.
pub fn defaults() -> Defaults {
    Defaults::new()
        .with("font-site-title", "sans-serif")
        .with("font-header", "sans-serif")
        .with("font-body", "sans-serif")
        .with("font-site-title-size", 34)
        .with("font-site-tagline-size", 12)
        .with("font-nav-size", 14)
        .with("font-header-size", 32)
        .with("font-widget-size", 13)
        .with("font-body-size", 17)
}
