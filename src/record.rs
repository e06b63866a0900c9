//! The log record and its timestamp identifiers.
//!
//! A record id is the UTC instant of ingestion rendered as ISO-8601 with a
//! fixed microsecond fraction and a `Z` suffix, e.g.
//! `2024-03-01T09:15:02.125000Z`. The fixed width makes lexicographic order
//! of ids identical to chronological order.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Format accepted by [`is_record_id`] (the `Z` is matched separately).
const ID_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A single ingested log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub message: String,
}

impl Record {
    /// Build a record stamped with the given instant.
    pub fn new_at(at: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            id: record_id_at(at),
            message: message.into(),
        }
    }
}

/// Render an instant as a record id.
pub fn record_id_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Whether `id` has the exact shape produced by [`record_id_at`].
pub fn is_record_id(id: &str) -> bool {
    match id.strip_suffix('Z') {
        Some(naive) => {
            naive.len() == 26 && NaiveDateTime::parse_from_str(naive, ID_FORMAT).is_ok()
        }
        None => false,
    }
}

/// Sort records most recent first.
///
/// Ties cannot occur for records read from a store keyed by id, but the
/// message is used as a secondary key so the order stays total.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.id.cmp(&a.id).then_with(|| b.message.cmp(&a.message)));
}
