//! cost-tracker: alert ingestion and recent-log queries.
//!
//! Inbound triggers (alarm notifications and scheduled ticks) are written
//! as timestamped records to a key-value store; the query side returns the
//! most recent records, newest first, over HTTP.

pub mod api;
pub mod config;
pub mod event;
pub mod handlers;
pub mod record;
pub mod scheduler;
pub mod storage;
pub mod utils;
