use alloy_primitives::{B256, U256};
use std::fmt::{Display, Formatter};

/// A block reference: its height and hash.
///
/// Numbers use [`U256`] rather than `u64` because the store round-trips them
/// through arbitrary-precision `NUMERIC` columns and some chains run ahead of
/// 64 bits of block height long before anyone notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub number: U256,
    pub hash: B256,
}

impl Block {
    pub fn new(number: U256, hash: B256) -> Self {
        Self { number, hash }
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.number, self.hash)
    }
}
