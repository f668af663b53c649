//! Kafka adapters: an ingest consumer that turns inbound request envelopes
//! into Request Store rows, and a status sink that turns lifecycle events
//! into outbound CloudEvents-shaped envelopes.

mod error;
mod ingest;
mod sink;

pub use error::{IngestError, SinkError};
pub use ingest::IngestConsumer;
pub use sink::{KafkaStatusSink, StatusSink};
