use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use relay_chain::{ChainClient, InMemoryChainClient};
use relay_kafka::StatusSink;
use relay_signer::{LocalSigner, RemoteSigner};
use relay_store::{RequestStore, StoreError};
use relay_types::{Block, NewRequest, Request, StatusEvent};

use super::*;

#[derive(Default)]
struct FakeStore {
    rows: Mutex<HashMap<String, Request>>,
}

#[async_trait]
impl RequestStore for FakeStore {
    async fn insert_new(&self, request: NewRequest) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        rows.entry(request.id.clone()).or_insert_with(|| Request {
            id: request.id,
            wallet_index: request.wallet_index,
            to: request.to,
            data: request.data,
            nonce: None,
            gas_price: None,
            hash: None,
            submitted_block: None,
            boosted_block: None,
            mined_block: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn active_request(&self, wallet_index: u32) -> Result<Option<Request>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|r| r.wallet_index == wallet_index && r.submitted_block.is_some())
            .cloned())
    }

    async fn next_queued_request(&self, wallet_index: u32) -> Result<Option<Request>, StoreError> {
        let mut candidates: Vec<Request> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.wallet_index == wallet_index && r.submitted_block.is_none())
            .cloned()
            .collect();
        candidates.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(candidates.into_iter().next())
    }

    async fn mark_submitted(
        &self,
        id: &str,
        nonce: u64,
        gas_price: U256,
        hash: B256,
        submitted_block: Block,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(id).unwrap();
        row.nonce = Some(nonce);
        row.gas_price = Some(gas_price);
        row.hash = Some(hash);
        row.submitted_block = Some(submitted_block);
        Ok(())
    }

    async fn mark_boosted(
        &self,
        id: &str,
        gas_price: U256,
        hash: B256,
        boosted_block: Block,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(id).unwrap();
        row.gas_price = Some(gas_price);
        row.hash = Some(hash);
        row.boosted_block = Some(boosted_block);
        Ok(())
    }

    async fn mark_mined(&self, id: &str, mined_block: Block, hash: B256) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(id).unwrap();
        row.mined_block = Some(mined_block);
        row.hash = Some(hash);
        Ok(())
    }

    async fn clear_mined(&self, id: &str) -> Result<(), StoreError> {
        self.rows.lock().unwrap().get_mut(id).unwrap().mined_block = None;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.rows.lock().unwrap().remove(id);
        Ok(())
    }

    async fn delete_oldest(&self) -> Result<Request, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.values().min_by_key(|r| r.created_at).map(|r| r.id.clone()).ok_or(StoreError::Empty)?;
        Ok(rows.remove(&id).unwrap())
    }
}

#[derive(Default)]
struct FakeSink {
    events: Mutex<Vec<StatusEvent>>,
}

#[async_trait]
impl StatusSink for FakeSink {
    async fn emit(&self, event: StatusEvent) -> Result<(), relay_kafka::SinkError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

fn config(wallet_index: u32) -> WorkerConfig {
    WorkerConfig {
        wallet_index,
        chain_id: 1,
        block_time: Duration::from_millis(1),
        confirmation_blocks: 3,
        boost_after_blocks: 5,
        disable_boosting: false,
    }
}

struct Harness {
    worker: TickerWorker,
    store: Arc<FakeStore>,
    chain: Arc<InMemoryChainClient>,
    sink: Arc<FakeSink>,
}

fn harness(wallet_index: u32) -> Harness {
    let store = Arc::new(FakeStore::default());
    let chain = Arc::new(InMemoryChainClient::new(1));
    let signer = Arc::new(LocalSigner::from_bytes(&[wallet_index as u8 + 1; 32]).unwrap());
    let sink = Arc::new(FakeSink::default());
    let registry = prometheus::Registry::new();
    let metrics = WorkerMetrics::register(&registry);
    let worker = TickerWorker::new(
        config(wallet_index),
        store.clone() as Arc<dyn RequestStore>,
        chain.clone() as Arc<dyn ChainClient>,
        signer as Arc<dyn RemoteSigner>,
        sink.clone() as Arc<dyn StatusSink>,
        metrics,
    );
    Harness { worker, store, chain, sink }
}

fn events_of(sink: &FakeSink) -> Vec<StatusEvent> {
    sink.events.lock().unwrap().clone()
}

#[tokio::test]
async fn happy_path_submits_mines_and_confirms() {
    let h = harness(2);
    h.store
        .insert_new(NewRequest { id: "r1".into(), wallet_index: 2, to: Address::repeat_byte(7), data: Bytes::new() })
        .await
        .unwrap();

    h.chain.set_head(1, B256::repeat_byte(1));
    h.worker.tick().await.unwrap();
    assert!(matches!(events_of(&h.sink).last(), Some(StatusEvent::Submitted { .. })));
    let active = h.store.active_request(2).await.unwrap().unwrap();
    assert_eq!(active.submitted_block.unwrap().number, U256::from(1));

    let hash = active.hash.unwrap();
    h.chain.set_head(2, B256::repeat_byte(2));
    h.chain.set_receipt(hash, sample_receipt(hash, 2, true));
    h.worker.tick().await.unwrap();
    assert!(matches!(events_of(&h.sink).last(), Some(StatusEvent::Mined { .. })));

    h.chain.set_head(5, B256::repeat_byte(5));
    h.worker.tick().await.unwrap();
    match events_of(&h.sink).last() {
        Some(StatusEvent::Confirmed { successful, .. }) => assert!(*successful),
        other => panic!("expected Confirmed, got {other:?}"),
    }
    assert!(h.store.active_request(2).await.unwrap().is_none());
}

#[tokio::test]
async fn stuck_receipt_triggers_boost_after_configured_blocks() {
    let h = harness(0);
    h.store
        .insert_new(NewRequest { id: "r1".into(), wallet_index: 0, to: Address::repeat_byte(7), data: Bytes::new() })
        .await
        .unwrap();
    h.chain.set_head(1, B256::repeat_byte(1));
    h.worker.tick().await.unwrap();
    let first = h.store.active_request(0).await.unwrap().unwrap();
    let first_gas_price = first.gas_price.unwrap();

    h.chain.set_head(1 + 5, B256::repeat_byte(9));
    h.worker.tick().await.unwrap();

    let boosted = h.store.active_request(0).await.unwrap().unwrap();
    assert!(boosted.boosted_block.is_some());
    assert!(boosted.gas_price.unwrap() >= first_gas_price * U256::from(12) / U256::from(10));
    assert_eq!(boosted.nonce, first.nonce);
}

#[tokio::test]
async fn reorg_unmine_then_remine_emits_a_fresh_mined_event() {
    let h = harness(1);
    h.store
        .insert_new(NewRequest { id: "r1".into(), wallet_index: 1, to: Address::repeat_byte(7), data: Bytes::new() })
        .await
        .unwrap();
    h.chain.set_head(1, B256::repeat_byte(1));
    h.worker.tick().await.unwrap();
    let hash = h.store.active_request(1).await.unwrap().unwrap().hash.unwrap();

    h.chain.set_head(2, B256::repeat_byte(2));
    h.chain.set_receipt(hash, sample_receipt(hash, 2, true));
    h.worker.tick().await.unwrap();
    assert!(h.store.active_request(1).await.unwrap().unwrap().mined_block.is_some());

    h.chain.clear_receipt(hash);
    h.chain.set_head(3, B256::repeat_byte(3));
    h.worker.tick().await.unwrap();
    assert!(h.store.active_request(1).await.unwrap().unwrap().mined_block.is_none());

    h.chain.set_receipt(hash, sample_receipt(hash, 4, true));
    h.chain.set_head(4, B256::repeat_byte(4));
    let mined_before = events_of(&h.sink).iter().filter(|e| matches!(e, StatusEvent::Mined { .. })).count();
    h.worker.tick().await.unwrap();
    let mined_after = events_of(&h.sink).iter().filter(|e| matches!(e, StatusEvent::Mined { .. })).count();
    assert_eq!(mined_after, mined_before + 1);
}

fn sample_receipt(hash: B256, block_number: u64, success: bool) -> alloy_rpc_types_eth::TransactionReceipt {
    use alloy_consensus::{Eip658Value, Receipt, ReceiptEnvelope, ReceiptWithBloom};

    let receipt = Receipt { status: Eip658Value::Eip658(success), cumulative_gas_used: 21_000, logs: vec![] };
    let envelope = ReceiptEnvelope::Legacy(ReceiptWithBloom::new(receipt, Default::default()));
    alloy_rpc_types_eth::TransactionReceipt {
        inner: envelope,
        transaction_hash: hash,
        transaction_index: Some(0),
        block_hash: Some(B256::repeat_byte(block_number as u8)),
        block_number: Some(block_number),
        gas_used: 21_000,
        effective_gas_price: 1_000_000_000,
        blob_gas_used: None,
        blob_gas_price: None,
        from: Address::repeat_byte(1),
        to: Some(Address::repeat_byte(7)),
        contract_address: None,
    }
}
