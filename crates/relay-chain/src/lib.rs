//! A minimal EVM JSON-RPC capability set, legacy (non-EIP-1559) gas
//! pricing only, behind the [`ChainClient`] trait.
//!
//! Two implementations: [`AlloyChainClient`] wraps a real `alloy` JSON-RPC
//! provider; [`InMemoryChainClient`] scripts head/receipt/error sequences
//! for worker-level tests without touching the network.

mod alloy_client;
mod client;
mod error;
mod memory;
mod types;

pub use alloy_client::AlloyChainClient;
pub use client::ChainClient;
pub use error::{ChainError, decode_structured_error};
pub use memory::InMemoryChainClient;
pub use types::{CallRequest, Header, Log, TransactionReceipt};
