mod config;
pub mod database;
pub mod memory;

pub use config::{Config, InsightConfig, LoggingConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Key of the persisted start timestamp (decimal epoch milliseconds).
pub const FAST_START_KEY: &str = "fastStartTime";
/// Key of the persisted `UserProgress` JSON.
pub const PROGRESS_KEY: &str = "chronos_user_progress";

/// String key-value storage with atomic per-call writes.
///
/// The session controller is the only writer, so implementations need no
/// cross-call transactions.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete; removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `CHRONOS_HOME` overrides the location outright. Otherwise this is
/// `~/.config/chronos`, or `~/.config/chronos-dev` when `CHRONOS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("CHRONOS_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("CHRONOS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("chronos-dev")
            } else {
                base_dir.join("chronos")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
