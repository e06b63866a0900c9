//! Handler configuration types.

use serde::Deserialize;

/// Message stored when an inbound event carries no usable text.
pub const DEFAULT_MESSAGE: &str = "Test alert";

/// Records returned when a query names no limit.
pub const DEFAULT_QUERY_LIMIT: u32 = 10;

/// Upper bound on records returned by one query.
pub const DEFAULT_MAX_QUERY_LIMIT: u32 = 1000;

/// Longest accepted scheduled tick interval (one year).
pub const MAX_SCHEDULE_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// Ingest handler configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Fallback message for payload-less or unrecognized events.
    pub default_message: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            default_message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

/// Query handler configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Limit applied when the caller gives none.
    pub default_limit: u32,
    /// Larger requested limits are clamped to this.
    pub max_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_QUERY_LIMIT,
            max_limit: DEFAULT_MAX_QUERY_LIMIT,
        }
    }
}

/// Scheduled tick configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between scheduled ticks. Unset disables the ticker.
    pub interval_secs: Option<u64>,
}
