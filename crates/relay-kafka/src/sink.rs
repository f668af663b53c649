use std::time::Duration;

use async_trait::async_trait;
use rdkafka::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use relay_types::StatusEvent;

use crate::error::SinkError;

/// Write-only channel for the four lifecycle events. Delivery is
/// at-least-once and fire-and-forget: the worker logs a send failure but
/// never lets it block or fail a tick, since consumers are required to
/// tolerate duplicate or (rarely) missing events and re-derive truth from
/// the next tick's chain reads.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn emit(&self, event: StatusEvent) -> Result<(), SinkError>;
}

pub struct KafkaStatusSink {
    producer: FutureProducer,
    topic: String,
}

impl KafkaStatusSink {
    pub fn new(bootstrap_servers: &str, topic: impl Into<String>) -> Result<Self, SinkError> {
        let producer = ClientConfig::new()
            .set("bootstrap.servers", bootstrap_servers)
            .set("message.timeout.ms", "10000")
            .create()
            .map_err(|e| SinkError::Produce(e.to_string()))?;
        Ok(Self { producer, topic: topic.into() })
    }
}

#[async_trait]
impl StatusSink for KafkaStatusSink {
    async fn emit(&self, event: StatusEvent) -> Result<(), SinkError> {
        let request_id = event.request_id().to_string();
        let event_id = uuid::Uuid::new_v4().to_string();
        let envelope = event.into_envelope(event_id);
        let payload = serde_json::to_vec(&envelope)?;

        let record = FutureRecord::to(&self.topic).key(&request_id).payload(&payload);
        self.producer
            .send(record, Duration::from_secs(0))
            .await
            .map_err(|(e, _)| SinkError::Produce(e.to_string()))?;
        Ok(())
    }
}
