use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;

use crate::client::ChainClient;
use crate::error::ChainError;
use crate::types::{CallRequest, Header, TransactionReceipt};

/// A fully in-memory [`ChainClient`] double, so worker-level tests can
/// script `Head`, `Receipt`, and error sequences without touching the
/// network.
///
/// Every method reads from / writes to plain `Mutex`-guarded state; there
/// is no simulated block production beyond what the test sets directly via
/// [`InMemoryChainClient::set_head`] and friends.
#[derive(Default)]
pub struct InMemoryChainClient {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    head: Header,
    receipts: HashMap<B256, TransactionReceipt>,
    gas_price: U256,
    nonces: HashMap<Address, u64>,
    next_estimate: Option<Result<u64, ChainError>>,
    broadcasts: Vec<Bytes>,
    chain_id: u64,
}

impl InMemoryChainClient {
    pub fn new(chain_id: u64) -> Self {
        Self {
            state: Mutex::new(State {
                head: Header { number: 0, hash: B256::ZERO },
                receipts: HashMap::new(),
                gas_price: U256::from(1_000_000_000u64),
                nonces: HashMap::new(),
                next_estimate: None,
                broadcasts: Vec::new(),
                chain_id,
            }),
        }
    }

    pub fn set_head(&self, number: u64, hash: B256) {
        self.state.lock().unwrap().head = Header { number, hash };
    }

    pub fn set_receipt(&self, hash: B256, receipt: TransactionReceipt) {
        self.state.lock().unwrap().receipts.insert(hash, receipt);
    }

    pub fn clear_receipt(&self, hash: B256) {
        self.state.lock().unwrap().receipts.remove(&hash);
    }

    pub fn set_gas_price(&self, price: U256) {
        self.state.lock().unwrap().gas_price = price;
    }

    pub fn set_nonce(&self, address: Address, nonce: u64) {
        self.state.lock().unwrap().nonces.insert(address, nonce);
    }

    /// Scripts the result of the next `estimate_gas` call only.
    pub fn queue_estimate(&self, result: Result<u64, ChainError>) {
        self.state.lock().unwrap().next_estimate = Some(result);
    }

    pub fn broadcasts(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().broadcasts.clone()
    }
}

#[async_trait]
impl ChainClient for InMemoryChainClient {
    async fn header_by_number_latest(&self) -> Result<Header, ChainError> {
        Ok(self.state.lock().unwrap().head)
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, ChainError> {
        Ok(self.state.lock().unwrap().receipts.get(&hash).cloned())
    }

    async fn suggest_gas_price(&self) -> Result<U256, ChainError> {
        Ok(self.state.lock().unwrap().gas_price)
    }

    async fn estimate_gas(&self, _call: CallRequest) -> Result<u64, ChainError> {
        let mut state = self.state.lock().unwrap();
        match state.next_estimate.take() {
            Some(result) => result,
            None => Ok(21_000),
        }
    }

    async fn send_raw_transaction(&self, signed_tx: Bytes) -> Result<B256, ChainError> {
        let mut state = self.state.lock().unwrap();
        let hash = alloy_primitives::keccak256(&signed_tx);
        state.broadcasts.push(signed_tx);
        Ok(hash)
    }

    async fn pending_nonce_at(&self, address: Address) -> Result<u64, ChainError> {
        Ok(*self.state.lock().unwrap().nonces.entry(address).or_insert(0))
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(self.state.lock().unwrap().chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn receipt_absent_until_scripted() {
        let client = InMemoryChainClient::new(1);
        let hash = B256::repeat_byte(9);
        assert!(client.transaction_receipt(hash).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unseen_nonce_starts_at_zero() {
        let client = InMemoryChainClient::new(1);
        assert_eq!(client.pending_nonce_at(Address::ZERO).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn scripted_estimate_is_consumed_once() {
        let client = InMemoryChainClient::new(1);
        client.queue_estimate(Ok(999));
        let call = CallRequest { from: Address::ZERO, to: Address::ZERO, gas_price: U256::ZERO, data: Bytes::new() };
        assert_eq!(client.estimate_gas(call.clone()).await.unwrap(), 999);
        assert_eq!(client.estimate_gas(call).await.unwrap(), 21_000);
    }
}
