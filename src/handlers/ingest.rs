//! Ingest handler: one inbound event becomes one stored record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, info, warn};

use super::{HandlerError, Result};
use crate::config::IngestConfig;
use crate::event::InboundEvent;
use crate::record::Record;
use crate::storage::RecordStore;

/// Normalizes inbound events into records and appends them to the store.
///
/// Every call writes exactly one new record stamped with the time of the
/// call. There is no retry; a failed write is returned to the caller.
pub struct IngestHandler {
    store: Arc<dyn RecordStore>,
    config: IngestConfig,
}

impl IngestHandler {
    pub fn new(store: Arc<dyn RecordStore>, config: IngestConfig) -> Self {
        Self { store, config }
    }

    /// Ingest a raw JSON trigger payload.
    pub async fn ingest_json(&self, payload: &Value) -> Result<Record> {
        info!(event = %payload, "Received event");
        let event = InboundEvent::from_json(payload);
        self.ingest(&event).await
    }

    /// Ingest a raw request body. Bodies that are not JSON are malformed.
    pub async fn ingest_body(&self, body: &[u8]) -> Result<Record> {
        info!(event = %String::from_utf8_lossy(body), "Received event");
        let event = InboundEvent::from_slice(body);
        self.ingest(&event).await
    }

    /// Ingest an event stamped with the current time.
    pub async fn ingest(&self, event: &InboundEvent) -> Result<Record> {
        self.ingest_at(event, Utc::now()).await
    }

    /// Ingest an event stamped with `at`.
    pub async fn ingest_at(&self, event: &InboundEvent, at: DateTime<Utc>) -> Result<Record> {
        if matches!(event, InboundEvent::Malformed) {
            warn!(
                default_message = %self.config.default_message,
                "Unrecognized inbound event, storing default message"
            );
        }

        let record = Record::new_at(at, event.message_or(&self.config.default_message));

        self.store.put(&record).await.map_err(|e| {
            error!(id = %record.id, error = %e, "Failed to store record");
            HandlerError::StoreUnavailable(e)
        })?;

        info!(id = %record.id, kind = event.kind(), "Log stored");
        Ok(record)
    }
}
