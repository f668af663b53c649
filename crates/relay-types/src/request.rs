use crate::block::Block;
use alloy_primitives::{Address, B256, Bytes, U256};
use chrono::{DateTime, Utc};

/// A meta-transaction request and its current per-attempt submission state.
///
/// Mirrors the `meta_transaction_requests` table one column per field. A
/// freshly inserted row has every field below `data` unset; fields are filled
/// in as the owning [`crate::event`]-emitting worker advances the row through
/// its lifecycle. See the module-level invariants in the crate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: String,
    pub wallet_index: u32,
    pub to: Address,
    pub data: Bytes,

    pub nonce: Option<u64>,
    pub gas_price: Option<U256>,
    pub hash: Option<B256>,

    pub submitted_block: Option<Block>,
    pub boosted_block: Option<Block>,
    pub mined_block: Option<Block>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Request {
    /// A row not yet submitted (I1: `submitted_block.is_none()`).
    pub fn is_pending(&self) -> bool {
        self.submitted_block.is_none()
    }

    /// The block at which this row was last (re-)broadcast: the boosted
    /// block if it has been boosted, else the original submission block.
    pub fn last_send_block(&self) -> Option<&Block> {
        self.boosted_block.as_ref().or(self.submitted_block.as_ref())
    }
}

/// Fields supplied by the caller when inserting a brand-new request.
///
/// Deliberately excludes everything the store itself assigns
/// (`nonce`, `gas_price`, `hash`, block columns, timestamps).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub id: String,
    pub wallet_index: u32,
    pub to: Address,
    pub data: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(submitted: Option<Block>, boosted: Option<Block>) -> Request {
        Request {
            id: "r1".into(),
            wallet_index: 0,
            to: Address::ZERO,
            data: Bytes::default(),
            nonce: None,
            gas_price: None,
            hash: None,
            submitted_block: submitted,
            boosted_block: boosted,
            mined_block: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pending_row_has_no_submitted_block() {
        assert!(request(None, None).is_pending());
        assert!(!request(Some(Block::new(U256::from(1), B256::ZERO)), None).is_pending());
    }

    #[test]
    fn last_send_block_prefers_boosted() {
        let submitted = Block::new(U256::from(1), B256::ZERO);
        let boosted = Block::new(U256::from(2), B256::repeat_byte(1));
        let req = request(Some(submitted), Some(boosted));
        assert_eq!(req.last_send_block(), Some(&boosted));

        let req2 = request(Some(submitted), None);
        assert_eq!(req2.last_send_block(), Some(&submitted));
    }
}
