use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("kafka produce error: {0}")]
    Produce(String),

    #[error("failed to serialize status envelope: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("kafka consumer error: {0}")]
    Consumer(#[from] rdkafka::error::KafkaError),

    #[error("store error: {0}")]
    Store(#[from] relay_store::StoreError),
}
