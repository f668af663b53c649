use std::sync::Arc;

use rdkafka::ClientConfig;
use rdkafka::Message;
use rdkafka::consumer::{Consumer, StreamConsumer};
use relay_store::RequestStore;
use relay_types::{CloudEvent, NewRequest, RequestEnvelopeData};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::error::IngestError;

static REQUESTS_TOTAL: std::sync::OnceLock<prometheus::IntCounter> = std::sync::OnceLock::new();

fn requests_total() -> &'static prometheus::IntCounter {
    REQUESTS_TOTAL.get_or_init(|| {
        prometheus::register_int_counter!(
            "meta_transaction_processor_consumer_requests_total",
            "Number of inbound request envelopes consumed."
        )
        .expect("metric registration is infallible outside of name collisions")
    })
}

/// Decodes inbound request envelopes and idempotently inserts rows into
/// the Request Store, assigning a wallet index by hashing the request id.
pub struct IngestConsumer {
    consumer: StreamConsumer,
    store: Arc<dyn RequestStore>,
    num_wallets: u32,
}

impl IngestConsumer {
    pub fn new(
        bootstrap_servers: &str,
        group_id: &str,
        topic: &str,
        store: Arc<dyn RequestStore>,
        num_wallets: u32,
    ) -> Result<Self, IngestError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", bootstrap_servers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .create()?;
        consumer.subscribe(&[topic])?;
        Ok(Self { consumer, store, num_wallets })
    }

    /// Runs until `cancellation` fires, committing each message's offset
    /// only after its row is durably upserted.
    pub async fn run(&self, cancellation: CancellationToken) -> Result<(), IngestError> {
        loop {
            let message = tokio::select! {
                _ = cancellation.cancelled() => return Ok(()),
                received = self.consumer.recv() => received?,
            };

            requests_total().inc();
            let payload = message.payload().unwrap_or_default();
            match serde_json::from_slice::<CloudEvent<RequestEnvelopeData>>(payload) {
                Ok(envelope) => {
                    let data = envelope.data;
                    let wallet_index = wallet_index_for(&data.id, self.num_wallets);
                    let span = tracing::info_span!("ingest", request_id = %data.id, wallet_index);
                    async {
                        let request = NewRequest { id: data.id, wallet_index, to: data.to, data: data.data };
                        if let Err(error) = self.store.insert_new(request).await {
                            tracing::error!(%error, "failed to store inbound request");
                        }
                    }
                    .instrument(span)
                    .await;
                }
                Err(error) => {
                    tracing::warn!(%error, "couldn't parse inbound request envelope, skipping");
                }
            }

            self.consumer.commit_message(&message, rdkafka::consumer::CommitMode::Async)?;
        }
    }
}

/// Deterministic wallet assignment: the same request id always lands on
/// the same wallet, so a re-delivered message is idempotent end to end.
fn wallet_index_for(id: &str, num_wallets: u32) -> u32 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    id.hash(&mut hasher);
    (hasher.finish() % num_wallets as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_assignment_is_deterministic() {
        assert_eq!(wallet_index_for("r1", 4), wallet_index_for("r1", 4));
    }

    #[test]
    fn wallet_assignment_stays_in_range() {
        for id in ["a", "b", "c", "request-123"] {
            assert!(wallet_index_for(id, 3) < 3);
        }
    }
}
