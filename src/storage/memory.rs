//! In-process RecordStore.
//!
//! Holds items in a map keyed by id. Used for local development and as the
//! store behind handler and API tests, so it also supports failure injection
//! and planting unreadable items.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MalformedItem, RecordStore, Result, ScanOutput, StorageError};
use crate::record::{is_record_id, Record};

/// A stored item. Planted items may be missing their message.
#[derive(Debug, Clone)]
struct StoredItem {
    id: String,
    message: Option<String>,
}

/// RecordStore backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryRecordStore {
    items: RwLock<HashMap<String, StoredItem>>,
    fail_on_put: RwLock<bool>,
    fail_on_scan: RwLock<bool>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_put(&self, fail: bool) {
        *self.fail_on_put.write().await = fail;
    }

    pub async fn set_fail_on_scan(&self, fail: bool) {
        *self.fail_on_scan.write().await = fail;
    }

    /// Insert an item bypassing record validation.
    pub async fn insert_raw(&self, id: impl Into<String>, message: Option<String>) {
        let id = id.into();
        self.items
            .write()
            .await
            .insert(id.clone(), StoredItem { id, message });
    }

    /// Number of items held, readable or not.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Look up a record by id.
    pub async fn get(&self, id: &str) -> Option<Record> {
        let items = self.items.read().await;
        let item = items.get(id)?;
        item.message.as_ref().map(|message| Record {
            id: item.id.clone(),
            message: message.clone(),
        })
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put(&self, record: &Record) -> Result<()> {
        if *self.fail_on_put.read().await {
            return Err(StorageError::Unavailable(
                "memory store rejecting writes".to_string(),
            ));
        }
        self.items.write().await.insert(
            record.id.clone(),
            StoredItem {
                id: record.id.clone(),
                message: Some(record.message.clone()),
            },
        );
        Ok(())
    }

    async fn scan(&self, _limit_hint: usize) -> Result<ScanOutput> {
        if *self.fail_on_scan.read().await {
            return Err(StorageError::Unavailable(
                "memory store rejecting reads".to_string(),
            ));
        }
        let items = self.items.read().await;
        let mut output = ScanOutput::default();
        for item in items.values() {
            if !is_record_id(&item.id) {
                output
                    .malformed
                    .push(MalformedItem::new(Some(item.id.clone()), "id is not a timestamp"));
                continue;
            }
            match &item.message {
                Some(message) => output.records.push(Record {
                    id: item.id.clone(),
                    message: message.clone(),
                }),
                None => output
                    .malformed
                    .push(MalformedItem::new(Some(item.id.clone()), "missing message")),
            }
        }
        Ok(output)
    }
}
