use alloy_primitives::{Address, B256, Bytes};
use serde::{Deserialize, Serialize};

use crate::envelope::CloudEvent;

pub const STATUS_EVENT_SOURCE: &str = "meta-transaction-processor";
pub const STATUS_EVENT_TYPE: &str = "zone.dimo.transaction.request.event";

/// One emitted `Log` entry, hex-encoded for the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// The four lifecycle transitions a request can emit (`§4.4`).
///
/// Only one of `successful`/`logs`/`data` is ever populated, depending on
/// which variant this is — see [`StatusEvent::into_data`].
#[derive(Debug, Clone)]
pub enum StatusEvent {
    Submitted { id: String, hash: B256 },
    Mined { id: String, hash: B256 },
    Confirmed { id: String, hash: B256, successful: bool, logs: Vec<Log> },
    Failed { id: String, data: Bytes },
}

impl StatusEvent {
    pub fn request_id(&self) -> &str {
        match self {
            StatusEvent::Submitted { id, .. }
            | StatusEvent::Mined { id, .. }
            | StatusEvent::Confirmed { id, .. }
            | StatusEvent::Failed { id, .. } => id,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            StatusEvent::Submitted { .. } => "Submitted",
            StatusEvent::Mined { .. } => "Mined",
            StatusEvent::Confirmed { .. } => "Confirmed",
            StatusEvent::Failed { .. } => "Failed",
        }
    }

    fn transaction(&self) -> TransactionPayload {
        match self {
            StatusEvent::Submitted { hash, .. } | StatusEvent::Mined { hash, .. } => {
                TransactionPayload { hash: Some(*hash), successful: None, logs: None, data: None }
            }
            StatusEvent::Confirmed { hash, successful, logs, .. } => TransactionPayload {
                hash: Some(*hash),
                successful: Some(*successful),
                logs: Some(logs.clone()),
                data: None,
            },
            StatusEvent::Failed { data, .. } => {
                TransactionPayload { hash: None, successful: None, logs: None, data: Some(data.clone()) }
            }
        }
    }

    /// Wraps this event in the CloudEvents envelope described in `§6`.
    ///
    /// `event_id` is caller-supplied (a KSUID or similarly sortable unique
    /// id) rather than generated here, since generating one is an impure
    /// operation the sink owns.
    pub fn into_envelope(self, event_id: String) -> CloudEvent<StatusEventData> {
        let kind = self.kind();
        let request_id = self.request_id().to_string();
        let transaction = self.transaction();
        CloudEvent::new(
            event_id,
            STATUS_EVENT_SOURCE,
            request_id.clone(),
            STATUS_EVENT_TYPE,
            StatusEventData { request_id, event_type: kind.to_string(), transaction },
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub hash: Option<B256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successful: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<Log>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEventData {
    pub request_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub transaction: TransactionPayload,
}
