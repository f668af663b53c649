use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_network::TransactionBuilder;
use alloy_rpc_types_eth::{BlockId, BlockNumberOrTag, BlockTransactionsKind, TransactionRequest};
use alloy_transport_http::Http;
use async_trait::async_trait;
use url::Url;

use crate::client::ChainClient;
use crate::error::ChainError;
use crate::types::{CallRequest, Header, TransactionReceipt};

/// A [`ChainClient`] backed by a plain JSON-RPC-over-HTTP `alloy` provider.
///
/// Unlike the teacher's payment-facilitator provider, this one never holds
/// a wallet filler: signing happens out-of-band via a `relay-signer`
/// implementation, and transactions reach this client already signed.
pub struct AlloyChainClient {
    provider: RootProvider,
    chain_id: u64,
}

impl AlloyChainClient {
    pub fn new(rpc_url: Url, chain_id: u64) -> Self {
        let client = RpcClient::new(Http::new(rpc_url), false);
        let provider = RootProvider::new(client);
        Self { provider, chain_id }
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn header_by_number_latest(&self) -> Result<Header, ChainError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .kind(BlockTransactionsKind::Hashes)
            .await?
            .ok_or_else(|| ChainError::Other("node returned no latest block".into()))?;
        Ok(Header { number: block.header.number, hash: block.header.hash })
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, ChainError> {
        Ok(self.provider.get_transaction_receipt(hash).await?)
    }

    async fn suggest_gas_price(&self) -> Result<U256, ChainError> {
        let price = self.provider.get_gas_price().await?;
        Ok(U256::from(price))
    }

    async fn estimate_gas(&self, call: CallRequest) -> Result<u64, ChainError> {
        let tx = TransactionRequest::default()
            .with_from(call.from)
            .with_to(call.to)
            .with_gas_price(call.gas_price.to::<u128>())
            .with_input(call.data);
        let gas = self.provider.estimate_gas(tx).block(BlockId::pending()).await?;
        Ok(gas)
    }

    async fn send_raw_transaction(&self, signed_tx: Bytes) -> Result<B256, ChainError> {
        let pending = self.provider.send_raw_transaction(&signed_tx).await?;
        Ok(*pending.tx_hash())
    }

    async fn pending_nonce_at(&self, address: Address) -> Result<u64, ChainError> {
        Ok(self.provider.get_transaction_count(address).pending().await?)
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(self.chain_id)
    }
}
