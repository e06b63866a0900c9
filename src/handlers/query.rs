//! Query handler: the most recent records, newest first.

use std::sync::Arc;

use tracing::{debug, error, warn};

use super::{HandlerError, Result};
use crate::config::QueryConfig;
use crate::record::{sort_newest_first, Record};
use crate::storage::RecordStore;

/// Reads, orders, and truncates records.
///
/// The store offers no ordered read, so every query scans the table and
/// sorts by id descending before truncating.
pub struct QueryHandler {
    store: Arc<dyn RecordStore>,
    config: QueryConfig,
}

impl QueryHandler {
    pub fn new(store: Arc<dyn RecordStore>, config: QueryConfig) -> Self {
        Self { store, config }
    }

    /// The limit a request resolves to: the default when absent, clamped
    /// to the configured maximum.
    pub fn effective_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.config.default_limit)
            .min(self.config.max_limit)
    }

    /// Return up to `limit` records, most recent first.
    ///
    /// A limit of zero returns an empty list without reading the store.
    pub async fn query(&self, limit: Option<u32>) -> Result<Vec<Record>> {
        let limit = self.effective_limit(limit);
        if limit == 0 {
            return Ok(Vec::new());
        }

        let scanned = self.store.scan(limit as usize).await.map_err(|e| {
            error!(error = %e, "Failed to scan record store");
            HandlerError::StoreUnavailable(e)
        })?;

        for item in &scanned.malformed {
            warn!(
                key = item.key.as_deref().unwrap_or("<none>"),
                reason = %item.reason,
                "Skipping malformed record"
            );
        }

        let mut records = scanned.records;
        sort_newest_first(&mut records);
        records.truncate(limit as usize);

        debug!(
            limit = limit,
            returned = records.len(),
            skipped = scanned.malformed.len(),
            "Query complete"
        );
        Ok(records)
    }
}
