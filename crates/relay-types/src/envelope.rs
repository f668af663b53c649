use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A CloudEvents-shaped envelope, used both for inbound request messages and
/// outbound status events.
///
/// Only the fields this service actually reads or writes are modeled;
/// unrecognized extra fields on inbound messages are ignored by `serde`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudEvent<T> {
    pub id: String,
    pub source: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub specversion: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: T,
}

impl<T> CloudEvent<T> {
    pub fn new(id: String, source: impl Into<String>, subject: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id,
            source: source.into(),
            subject: Some(subject.into()),
            specversion: "1.0".to_string(),
            time: Utc::now(),
            event_type: event_type.into(),
            data,
        }
    }
}

/// The `data` payload of an inbound request envelope (see `§6 EXTERNAL INTERFACES`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelopeData {
    pub id: String,
    pub to: alloy_primitives::Address,
    pub data: alloy_primitives::Bytes,
}
