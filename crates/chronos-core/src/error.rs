//! Core error types for chronos-core.
//!
//! The engine itself has no fatal paths: decode errors, invalid transitions
//! and insight failures are all recovered where they happen. These types
//! cover the operations that do report failure to the caller (saving,
//! configuration, the raw insight client).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for chronos-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Insight collaborator errors
    #[error("Insight error: {0}")]
    Insight(#[from] InsightError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another process
    #[error("Store is locked")]
    Locked,

    /// Could not resolve the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Insight collaborator errors.
#[derive(Error, Debug)]
pub enum InsightError {
    /// No API key in the configured environment variable
    #[error("API key not found in environment variable {0}")]
    MissingCredential(String),

    /// Insight generation disabled in config
    #[error("Insight generation is disabled")]
    Disabled,

    /// Transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response had no text candidate
    #[error("Response contained no text")]
    EmptyResponse,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked
                    || inner.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
