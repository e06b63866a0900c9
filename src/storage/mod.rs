//! Record storage.
//!
//! The [`RecordStore`] trait is the only seam between the handlers and
//! persistence. Backends:
//! - `MemoryRecordStore`: in-process, for local development and tests
//! - `SqliteRecordStore`: SQLite file (feature `sqlite`)
//! - `DynamoRecordStore`: DynamoDB table (feature `dynamo`)

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{StorageConfig, StorageType};
use crate::record::Record;

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "dynamo")]
pub mod dynamo;

pub use memory::MemoryRecordStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRecordStore;

#[cfg(feature = "dynamo")]
pub use dynamo::DynamoRecordStore;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("DynamoDB error: {0}")]
    Dynamo(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend '{0}' is not enabled in this build")]
    NotEnabled(&'static str),
}

/// An item that was present in the store but could not be read as a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedItem {
    /// The item's key, when one could be recovered.
    pub key: Option<String>,
    pub reason: String,
}

impl MalformedItem {
    pub fn new(key: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
        }
    }
}

/// Everything a scan found, split into readable records and skipped items.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub records: Vec<Record>,
    pub malformed: Vec<MalformedItem>,
}

/// Append/scan access to the log table.
///
/// Implementations must be safe to share across concurrent invocations; the
/// handlers hold no locks of their own.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Write a record keyed by its id. An existing record with the same id
    /// is overwritten.
    async fn put(&self, record: &Record) -> Result<()>;

    /// Read every item in the table, in no particular order.
    ///
    /// `limit_hint` is a page size for backends that page their reads; it
    /// never truncates the result.
    async fn scan(&self, limit_hint: usize) -> Result<ScanOutput>;
}

/// Initialize the record store named by configuration.
pub async fn init_storage(config: &StorageConfig) -> Result<Arc<dyn RecordStore>> {
    info!(storage_type = ?config.storage_type, "initializing record store");

    match config.storage_type {
        StorageType::Memory => Ok(Arc::new(MemoryRecordStore::new())),
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            let store = SqliteRecordStore::open(&config.sqlite.path).await?;
            store.init_schema().await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageType::Sqlite => {
            tracing::error!("SQLite storage requested but 'sqlite' feature is not enabled");
            Err(StorageError::NotEnabled("sqlite"))
        }
        #[cfg(feature = "dynamo")]
        StorageType::Dynamo => {
            let store = DynamoRecordStore::new(
                &config.dynamo.table,
                config.dynamo.endpoint_url.as_deref(),
            )
            .await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "dynamo"))]
        StorageType::Dynamo => {
            tracing::error!("DynamoDB storage requested but 'dynamo' feature is not enabled");
            Err(StorageError::NotEnabled("dynamo"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_memory_storage() {
        let config = StorageConfig {
            storage_type: StorageType::Memory,
            ..Default::default()
        };
        let store = init_storage(&config).await.unwrap();
        let scanned = store.scan(10).await.unwrap();
        assert!(scanned.records.is_empty());
    }

    #[cfg(not(feature = "dynamo"))]
    #[tokio::test]
    async fn test_init_disabled_backend_fails() {
        let config = StorageConfig {
            storage_type: StorageType::Dynamo,
            ..Default::default()
        };
        let result = init_storage(&config).await;
        assert!(matches!(result, Err(StorageError::NotEnabled("dynamo"))));
    }
}
