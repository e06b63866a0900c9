//! Periodic scheduled ticks.
//!
//! The `ScheduledTicker` runs as a background task in the server, feeding a
//! payload-less [`InboundEvent::ScheduledTick`] into the ingest handler on a
//! fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::event::InboundEvent;
use crate::handlers::{IngestHandler, Result};
use crate::record::Record;

/// Background task that ingests a scheduled tick every `interval`.
pub struct ScheduledTicker {
    ingest: Arc<IngestHandler>,
    interval: Duration,
}

impl ScheduledTicker {
    pub fn new(ingest: Arc<IngestHandler>, interval: Duration) -> Self {
        Self { ingest, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the ticker as a background task.
    ///
    /// The first tick fires one full interval after spawning. A failed
    /// ingest is logged and the next tick proceeds normally. Returns a
    /// handle that can be used to abort the task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let Some(start) = tokio::time::Instant::now().checked_add(self.interval) else {
                warn!(
                    interval = ?self.interval,
                    "Scheduled tick interval out of range, ticker not started"
                );
                return;
            };
            let mut interval = tokio::time::interval_at(start, self.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                match self.run_once().await {
                    Ok(record) => debug!(id = %record.id, "Scheduled tick stored"),
                    Err(e) => warn!(error = %e, "Scheduled tick failed to store"),
                }
            }
        })
    }

    /// Ingest one scheduled tick (for testing or manual invocation).
    pub async fn run_once(&self) -> Result<Record> {
        self.ingest.ingest(&InboundEvent::ScheduledTick).await
    }
}
