//! Ingest and query handlers.
//!
//! Both handlers are stateless apart from their store handle and
//! configuration, so one instance can serve any number of concurrent
//! invocations.

use crate::storage::StorageError;

pub mod ingest;
pub mod query;

pub use ingest::IngestHandler;
pub use query::QueryHandler;

/// Result type for handler operations.
pub type Result<T> = std::result::Result<T, HandlerError>;

/// Failures a handler reports to its caller.
///
/// Display text carries no store details; the storage error is available
/// as the source.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("record store unavailable")]
    StoreUnavailable(#[source] StorageError),
}
