//! DynamoDB RecordStore implementation.
//!
//! Table schema:
//! - PK: `id` (String), the record's ISO-8601 timestamp
//! - message: the record text (String)
//!
//! The table has no sort key or secondary index, so a scan reads every
//! item and ordering happens in the query handler.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::{debug, info};

use crate::record::{is_record_id, Record};
use crate::storage::{MalformedItem, RecordStore, Result, ScanOutput, StorageError};

const ID_ATTR: &str = "id";
const MESSAGE_ATTR: &str = "message";

/// DynamoDB implementation of RecordStore.
pub struct DynamoRecordStore {
    client: Client,
    table_name: String,
}

impl DynamoRecordStore {
    /// Create a new DynamoDB record store.
    pub async fn new(table_name: impl Into<String>, endpoint_url: Option<&str>) -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let client = if let Some(endpoint) = endpoint_url {
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(dynamo_config)
        } else {
            Client::new(&config)
        };

        Ok(Self::with_client(client, table_name))
    }

    /// Wrap an already-configured client.
    pub fn with_client(client: Client, table_name: impl Into<String>) -> Self {
        let table_name = table_name.into();
        info!(table = %table_name, "Connected to DynamoDB for records");
        Self { client, table_name }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// Convert a scanned item into a record.
fn item_to_record(
    item: &HashMap<String, AttributeValue>,
) -> std::result::Result<Record, MalformedItem> {
    let id = match item.get(ID_ATTR) {
        Some(AttributeValue::S(id)) => id.clone(),
        Some(_) => return Err(MalformedItem::new(None, "non-string id")),
        None => return Err(MalformedItem::new(None, "missing id")),
    };

    if !is_record_id(&id) {
        return Err(MalformedItem::new(Some(id), "id is not a timestamp"));
    }

    match item.get(MESSAGE_ATTR) {
        Some(AttributeValue::S(message)) => Ok(Record {
            id,
            message: message.clone(),
        }),
        Some(_) => Err(MalformedItem::new(Some(id), "non-string message")),
        None => Err(MalformedItem::new(Some(id), "missing message")),
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn put(&self, record: &Record) -> Result<()> {
        let mut item = HashMap::new();
        item.insert(ID_ATTR.to_string(), AttributeValue::S(record.id.clone()));
        item.insert(
            MESSAGE_ATTR.to_string(),
            AttributeValue::S(record.message.clone()),
        );

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| StorageError::Dynamo(format!("DynamoDB put_item failed: {}", e)))?;

        debug!(table = %self.table_name, id = %record.id, "Stored record in DynamoDB");
        Ok(())
    }

    async fn scan(&self, limit_hint: usize) -> Result<ScanOutput> {
        let page_size = i32::try_from(limit_hint.max(1)).unwrap_or(i32::MAX);
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        let mut output = ScanOutput::default();
        let mut pages = 0u32;

        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table_name)
                .limit(page_size)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| StorageError::Dynamo(format!("DynamoDB scan failed: {}", e)))?;
            pages += 1;

            for item in page.items() {
                match item_to_record(item) {
                    Ok(record) => output.records.push(record),
                    Err(malformed) => output.malformed.push(malformed),
                }
            }

            match page.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(
            table = %self.table_name,
            pages = pages,
            records = output.records.len(),
            malformed = output.malformed.len(),
            "Scanned DynamoDB table"
        );
        Ok(output)
    }
}
