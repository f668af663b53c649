use alloy_primitives::{B256, U256};
use async_trait::async_trait;
use relay_types::{Block, NewRequest, Request};

use crate::error::StoreError;

/// Durable storage for meta-transaction requests, keyed by their caller-supplied `id`.
///
/// All mutating operations are individually atomic (single-statement):
/// the worker never spans a store transaction across an RPC call, so a
/// crash mid-tick leaves the store in a state some later tick can resume
/// from cleanly.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Inserts a brand-new, not-yet-submitted request. Idempotent on `id`:
    /// a duplicate insert is a no-op, not an error.
    async fn insert_new(&self, request: NewRequest) -> Result<(), StoreError>;

    /// The unique row for `wallet_index` with a non-null submitted block,
    /// if any (invariant I1 guarantees at most one).
    async fn active_request(&self, wallet_index: u32) -> Result<Option<Request>, StoreError>;

    /// The oldest (by `id`) not-yet-submitted row for `wallet_index`.
    async fn next_queued_request(&self, wallet_index: u32) -> Result<Option<Request>, StoreError>;

    /// Records a first-time broadcast: nonce, gas price, hash, and the
    /// block the broadcast happened at.
    async fn mark_submitted(
        &self,
        id: &str,
        nonce: u64,
        gas_price: U256,
        hash: B256,
        submitted_block: Block,
    ) -> Result<(), StoreError>;

    /// Records a replacement broadcast at the same nonce.
    async fn mark_boosted(
        &self,
        id: &str,
        gas_price: U256,
        hash: B256,
        boosted_block: Block,
    ) -> Result<(), StoreError>;

    /// Records that a receipt was observed for this row's current hash.
    async fn mark_mined(&self, id: &str, mined_block: Block, hash: B256) -> Result<(), StoreError>;

    /// Clears a previously recorded mined block (reorg un-mine).
    async fn clear_mined(&self, id: &str) -> Result<(), StoreError>;

    /// Deletes a row outright (terminal Confirmed or Failed state).
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Deletes and returns the oldest row in the store, regardless of
    /// wallet or state — the manual escape hatch for a row stuck behind
    /// an orphaned nonce (see the Admin RPC).
    async fn delete_oldest(&self) -> Result<Request, StoreError>;
}
