use alloy_primitives::{Address, B256, Bytes, U256};

/// A block header, reduced to the two fields the worker needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub number: u64,
    pub hash: B256,
}

/// Parameters for an `eth_estimateGas` call against the pending/latest
/// block, legacy (non-EIP-1559) gas pricing only.
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub gas_price: U256,
    pub data: Bytes,
}

pub use alloy_rpc_types_eth::{Log, TransactionReceipt};
