use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;

use crate::error::ChainError;
use crate::types::{CallRequest, Header, TransactionReceipt};

/// The minimal EVM JSON-RPC capability set the worker needs.
///
/// A receipt lookup returning `None` is a first-class signal (no receipt
/// yet, or a reorg un-mined one), not an error — see [`ChainClient::transaction_receipt`].
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn header_by_number_latest(&self) -> Result<Header, ChainError>;

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, ChainError>;

    async fn suggest_gas_price(&self) -> Result<U256, ChainError>;

    /// May fail with a structured JSON-RPC error carrying revert data;
    /// see [`crate::error::decode_structured_error`].
    async fn estimate_gas(&self, call: CallRequest) -> Result<u64, ChainError>;

    async fn send_raw_transaction(&self, signed_tx: Bytes) -> Result<B256, ChainError>;

    async fn pending_nonce_at(&self, address: Address) -> Result<u64, ChainError>;

    async fn chain_id(&self) -> Result<u64, ChainError>;
}
