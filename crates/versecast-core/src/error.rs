//! Error types for VerseCast Core

use thiserror::Error;

/// Main error type for VerseCast operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Operator-facing rejections; the session is left untouched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Background box limit reached ({max} per theme)")]
    CapacityExceeded { max: usize },

    #[error("Unknown line type: {0}")]
    UnknownLineType(String),

    #[error("Theme is built-in and cannot be modified: {0}")]
    ReadOnlyTheme(String),
}

/// Failures while writing or broadcasting a theme
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to create theme: {0}")]
    CreateFailed(String),

    #[error("Failed to update theme {id}: {reason}")]
    UpdateFailed { id: String, reason: String },

    #[error("Failed to apply theme {id}: {reason}")]
    ApplyFailed { id: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Failures while fetching a theme; always recovered with schema defaults
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Theme not found: {0}")]
    NotFound(String),

    #[error("Malformed theme record: {0}")]
    Malformed(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Connection pool error: {0}")]
    Pool(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::Storage(StorageError::Pool(err.to_string()))
    }
}

impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
