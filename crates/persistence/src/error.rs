//! Storage failure type.

use thiserror::Error;

/// A durable medium rejected or failed an operation.
///
/// Not-found is never an error: lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage is not loaded; call reload() first")]
    NotLoaded,
}

pub type StorageResult<T> = Result<T, StorageError>;
