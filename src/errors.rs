use std::borrow::Cow;

use thiserror::Error;

/// Failure reported by a host `SettingsStore` implementation.
///
/// Hosts own their persistence; the engine only sees an opaque message.
#[derive(Debug, Error)]
#[error("settings store error: {message}")]
pub struct StoreError {
    pub message: Cow<'static, str>,
}

impl StoreError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Top-level error type returned by the migration engine.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Underlying settings store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The persisted migrated-version record could not be parsed.
    #[error("corrupt migration record: {0}")]
    CorruptState(#[from] serde_json::Error),

    /// A transform refused the value it was handed.
    #[error("transform failed for '{key}': {message}")]
    Transform {
        key: String,
        message: Cow<'static, str>,
    },

    /// Host-specific failures surfaced through transform callbacks.
    #[error("{message}")]
    Other { message: Cow<'static, str> },
}
