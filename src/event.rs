//! Inbound trigger events.
//!
//! Triggers arrive as JSON in one of a few envelopes. Parsing resolves them
//! into [`InboundEvent`], and [`InboundEvent::message_or`] applies the
//! extraction rule: a non-blank notification message is used verbatim,
//! everything else falls back to the configured default.
//!
//! Recognized envelopes:
//! - SNS function trigger: `{"Records":[{"EventSource":"aws:sns","Sns":{"Message":"..."}}]}`
//! - SNS HTTP(S) delivery: `{"Type":"Notification","Message":"..."}`
//! - EventBridge schedule: `{"source":"aws.events","detail-type":"Scheduled Event",...}`
//! - Bare trigger: `{}` or `null`

use serde_json::Value;
use tracing::{debug, warn};

/// An inbound trigger, resolved to one of the recognized shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A notification carrying (possibly absent) free text.
    Notification { message: Option<String> },
    /// A payload-less periodic trigger.
    ScheduledTick,
    /// A payload that matched no recognized envelope.
    Malformed,
}

impl InboundEvent {
    /// Notification carrying the given text.
    pub fn notification(message: impl Into<String>) -> Self {
        InboundEvent::Notification {
            message: Some(message.into()),
        }
    }

    /// Resolve a raw JSON payload.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => InboundEvent::ScheduledTick,
            Value::Object(map) if map.is_empty() => InboundEvent::ScheduledTick,
            Value::Object(map) => {
                if let Some(records) = map.get("Records") {
                    return from_sns_records(records);
                }
                if map.get("Type").and_then(Value::as_str) == Some("Notification") {
                    return InboundEvent::Notification {
                        message: string_field(value, "Message"),
                    };
                }
                if is_scheduled_event(value) {
                    return InboundEvent::ScheduledTick;
                }
                warn!("inbound event matched no known envelope");
                InboundEvent::Malformed
            }
            _ => {
                warn!("inbound event is not a JSON object");
                InboundEvent::Malformed
            }
        }
    }

    /// Resolve a raw request body. Bodies that are not JSON are malformed.
    pub fn from_slice(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return InboundEvent::ScheduledTick;
        }
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_json(&value),
            Err(e) => {
                warn!(error = %e, "inbound event body is not JSON");
                InboundEvent::Malformed
            }
        }
    }

    /// The text to store for this event.
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self {
            InboundEvent::Notification {
                message: Some(message),
            } if !message.trim().is_empty() => message.as_str(),
            _ => default,
        }
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Notification { .. } => "notification",
            InboundEvent::ScheduledTick => "scheduled_tick",
            InboundEvent::Malformed => "malformed",
        }
    }
}

fn from_sns_records(records: &Value) -> InboundEvent {
    let Some(records) = records.as_array() else {
        warn!("inbound event `Records` is not an array");
        return InboundEvent::Malformed;
    };
    let Some(first) = records.first() else {
        warn!("inbound event carries no records");
        return InboundEvent::Malformed;
    };
    if records.len() > 1 {
        debug!(
            count = records.len(),
            "inbound event carries several records, using the first"
        );
    }
    match first.get("Sns") {
        Some(sns) if sns.is_object() => InboundEvent::Notification {
            message: string_field(sns, "Message"),
        },
        _ => {
            warn!("inbound record has no SNS payload");
            InboundEvent::Malformed
        }
    }
}

fn is_scheduled_event(value: &Value) -> bool {
    value.get("source").and_then(Value::as_str) == Some("aws.events")
        || value.get("detail-type").and_then(Value::as_str) == Some("Scheduled Event")
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}
