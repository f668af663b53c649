use std::sync::Arc;
use std::time::Duration;

use alloy_consensus::TxReceipt;
use alloy_primitives::{Address, B256, Bytes, U256};
use relay_chain::{CallRequest, ChainClient, Header, decode_structured_error};
use relay_signer::RemoteSigner;
use relay_store::RequestStore;
use relay_types::{Block, Log, Request, StatusEvent};
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::metrics::WorkerMetrics;
use crate::sign::sign_legacy_tx;
use relay_kafka::StatusSink;

/// Parameters fixed for the lifetime of one wallet's worker.
#[derive(Clone)]
pub struct WorkerConfig {
    pub wallet_index: u32,
    pub chain_id: u64,
    pub block_time: Duration,
    pub confirmation_blocks: u64,
    pub boost_after_blocks: u64,
    pub disable_boosting: bool,
}

/// Advances one relayer wallet's request queue by one step per tick.
///
/// Holds no in-process mutable state beyond its own config: correctness
/// of the single-flight nonce invariant comes entirely from the
/// supervisor spawning exactly one worker per wallet index.
pub struct TickerWorker {
    config: WorkerConfig,
    store: Arc<dyn RequestStore>,
    chain: Arc<dyn ChainClient>,
    signer: Arc<dyn RemoteSigner>,
    sink: Arc<dyn StatusSink>,
    metrics: WorkerMetrics,
}

impl TickerWorker {
    pub fn new(
        config: WorkerConfig,
        store: Arc<dyn RequestStore>,
        chain: Arc<dyn ChainClient>,
        signer: Arc<dyn RemoteSigner>,
        sink: Arc<dyn StatusSink>,
        metrics: WorkerMetrics,
    ) -> Self {
        Self { config, store, chain, signer, sink, metrics }
    }

    /// Runs ticks on `block_time` cadence until `cancellation` fires.
    pub async fn run(&self, cancellation: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.block_time);
        loop {
            tokio::select! {
                _ = cancellation.cancelled() => return,
                _ = interval.tick() => self.run_one_tick().await,
            }
        }
    }

    async fn run_one_tick(&self) {
        self.metrics.ticks_total.inc();
        if let Err(error) = self.tick().await {
            self.metrics
                .tick_errors_total
                .with_label_values(&[&self.config.wallet_index.to_string()])
                .inc();
            tracing::error!(wallet_index = self.config.wallet_index, %error, "tick failed");
        }
    }

    #[tracing::instrument(name = "tick", skip(self), fields(wallet_index = self.config.wallet_index))]
    pub(crate) async fn tick(&self) -> Result<(), WorkerError> {
        let head = self.chain.header_by_number_latest().await?;
        self.metrics.latest_block.set(head.number as i64);

        match self.store.active_request(self.config.wallet_index).await? {
            Some(active) => {
                if self.handle_active(&head, active).await? {
                    self.promote_new_request(&head).await?;
                }
            }
            None => {
                self.age_gauge().set(0);
                self.promote_new_request(&head).await?;
            }
        }
        Ok(())
    }

    fn age_gauge(&self) -> prometheus::IntGauge {
        self.metrics.submitted_tx_block_age.with_label_values(&[&self.config.wallet_index.to_string()])
    }

    async fn emit(&self, event: StatusEvent) {
        if let Err(error) = self.sink.emit(event).await {
            tracing::error!(%error, "failed to emit status event");
        }
    }

    /// Returns `true` if the wallet became idle this tick (the row was
    /// confirmed and deleted), so the caller may promote a new request in
    /// the same tick.
    async fn handle_active(&self, head: &Header, active: Request) -> Result<bool, WorkerError> {
        let last_send = active.last_send_block().expect("active rows always have a submitted block");
        let age = head.number.saturating_sub(last_send.number.to::<u64>());
        self.age_gauge().set(age as i64);

        let hash = active.hash.expect("active rows always have a hash");
        let receipt = self.chain.transaction_receipt(hash).await?;

        let Some(receipt) = receipt else {
            if active.mined_block.is_some() {
                self.store.clear_mined(&active.id).await?;
                return Ok(false);
            }
            let last_send_number = last_send.number.to::<u64>();
            if head.number.saturating_sub(last_send_number) >= self.config.boost_after_blocks {
                self.boost(head, &active).await?;
            }
            return Ok(false);
        };

        let receipt_block_number = receipt.block_number.unwrap_or(head.number);
        let receipt_block_hash = receipt.block_hash.unwrap_or(hash);

        if active.mined_block.is_none() {
            let mined_block = Block::new(U256::from(receipt_block_number), receipt_block_hash);
            self.store.mark_mined(&active.id, mined_block, hash).await?;
            self.emit(StatusEvent::Mined { id: active.id.clone(), hash }).await;
            return Ok(false);
        }

        let mined_block = active.mined_block.expect("checked above");
        let confirmations = head.number.saturating_sub(receipt_block_number);

        if confirmations >= self.config.confirmation_blocks {
            let successful = receipt.status();
            let logs = receipt
                .logs()
                .iter()
                .map(|log| Log {
                    address: log.inner.address,
                    topics: log.inner.data.topics().to_vec(),
                    data: log.inner.data.data.clone(),
                })
                .collect();
            self.emit(StatusEvent::Confirmed { id: active.id.clone(), hash, successful, logs }).await;
            self.store.delete(&active.id).await?;
            Ok(true)
        } else if receipt_block_hash != mined_block.hash {
            let fresh = Block::new(U256::from(receipt_block_number), receipt_block_hash);
            self.store.mark_mined(&active.id, fresh, hash).await?;
            self.emit(StatusEvent::Mined { id: active.id.clone(), hash }).await;
            Ok(false)
        } else {
            Ok(false)
        }
    }

    async fn promote_new_request(&self, head: &Header) -> Result<(), WorkerError> {
        match self.store.next_queued_request(self.config.wallet_index).await? {
            Some(request) => self.submit(head, request).await?,
            None => self.age_gauge().set(0),
        }
        Ok(())
    }

    async fn submit(&self, head: &Header, request: Request) -> Result<(), WorkerError> {
        let from = self.signer.address();
        let nonce = self.chain.pending_nonce_at(from).await?;
        let gas_price = self.chain.suggest_gas_price().await? * U256::from(2);

        let Some(gas_limit) =
            self.estimate_or_fail(&request.id, from, request.to, gas_price, request.data.clone()).await?
        else {
            return Ok(());
        };

        let (hash, signed_tx) =
            sign_legacy_tx(self.signer.as_ref(), self.config.chain_id, nonce, gas_price, gas_limit, request.to, request.data.clone())
                .await?;

        let submitted_block = Block::new(U256::from(head.number), head.hash);
        self.store.mark_submitted(&request.id, nonce, gas_price, hash, submitted_block).await?;
        self.chain.send_raw_transaction(signed_tx).await?;
        self.emit(StatusEvent::Submitted { id: request.id, hash }).await;
        Ok(())
    }

    async fn boost(&self, head: &Header, active: &Request) -> Result<(), WorkerError> {
        if self.config.disable_boosting {
            tracing::warn!(
                wallet_index = self.config.wallet_index,
                request_id = %active.id,
                "boosting disabled, leaving active row in place"
            );
            return Ok(());
        }

        let previous_gas_price = active.gas_price.expect("active rows always have a gas price");
        let nonce = active.nonce.expect("active rows always have a nonce");
        let suggested_floor = self.chain.suggest_gas_price().await? * U256::from(2);
        let boosted_floor = ceil_mul_1_2(previous_gas_price);
        let gas_price = suggested_floor.max(boosted_floor);

        let Some(gas_limit) =
            self.estimate_or_fail(&active.id, self.signer.address(), active.to, gas_price, active.data.clone()).await?
        else {
            return Ok(());
        };

        let (hash, signed_tx) = sign_legacy_tx(
            self.signer.as_ref(),
            self.config.chain_id,
            nonce,
            gas_price,
            gas_limit,
            active.to,
            active.data.clone(),
        )
        .await?;

        let boosted_block = Block::new(U256::from(head.number), head.hash);
        self.store.mark_boosted(&active.id, gas_price, hash, boosted_block).await?;
        self.chain.send_raw_transaction(signed_tx).await?;
        Ok(())
    }

    /// Estimates gas for a call, handling a structured revert as terminal:
    /// emits `Failed` and deletes the row, returning `Ok(None)`. Any other
    /// error propagates for retry next tick.
    async fn estimate_or_fail(
        &self,
        id: &str,
        from: Address,
        to: Address,
        gas_price: U256,
        data: Bytes,
    ) -> Result<Option<u64>, WorkerError> {
        let call = CallRequest { from, to, gas_price, data };
        match self.chain.estimate_gas(call).await {
            Ok(limit) => Ok(Some(limit.saturating_mul(2))),
            Err(error) => match decode_structured_error(&error) {
                Some(revert_data) => {
                    self.emit(StatusEvent::Failed { id: id.to_string(), data: revert_data }).await;
                    self.store.delete(id).await?;
                    Ok(None)
                }
                None => Err(error.into()),
            },
        }
    }
}

/// `ceil(1.2 * previous)`, required so a boost always satisfies both the
/// invariant and the EVM's replace-by-fee rule even under integer
/// rounding.
fn ceil_mul_1_2(previous: U256) -> U256 {
    (previous * U256::from(12) + U256::from(9)) / U256::from(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_mul_1_2_rounds_up() {
        assert_eq!(ceil_mul_1_2(U256::from(10)), U256::from(12));
        assert_eq!(ceil_mul_1_2(U256::from(11)), U256::from(14));
        assert_eq!(ceil_mul_1_2(U256::from(100)), U256::from(120));
    }
}
