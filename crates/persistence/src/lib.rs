//! Persistence layer for the rental listing backend.
//!
//! This crate contains:
//! - The [`Storage`] contract shared by every backend
//! - A JSON-file backend and a PostgreSQL backend
//! - Row mappings, schema SQL and query metrics for the relational backend
//! - Relationship helpers built on top of the contract

pub mod db;
pub mod db_storage;
pub mod entities;
pub mod error;
pub mod file_storage;
pub mod metrics;
pub mod relations;
pub mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

pub use db::DatabaseConfig;
pub use db_storage::DbStorage;
pub use error::{StorageError, StorageResult};
pub use file_storage::FileStorage;
pub use storage::Storage;

/// Which backend serves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Db,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::File => "file",
            StorageBackend::Db => "db",
        }
    }
}

/// Backend selection and file backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            file_path: default_file_path(),
        }
    }
}

fn default_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_file_path() -> PathBuf {
    PathBuf::from("file.json")
}

/// Builds the configured backend. Call [`Storage::reload`] before use.
///
/// `reset_on_reload` only affects the relational backend: every reload then
/// drops and recreates the schema.
pub fn open_storage(
    storage: &StorageConfig,
    database: &DatabaseConfig,
    reset_on_reload: bool,
) -> Arc<dyn Storage> {
    match storage.backend {
        StorageBackend::File => Arc::new(FileStorage::with_path(storage.file_path.clone())),
        StorageBackend::Db => Arc::new(DbStorage::with_config(database.clone(), reset_on_reload)),
    }
}
