use alloy_primitives::{Address, keccak256};
use k256::ecdsa::VerifyingKey;

/// Ethereum address derivation: keccak256 of the uncompressed public-key
/// point (sans the `0x04` prefix byte), low 20 bytes.
pub(crate) fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let uncompressed = key.to_encoded_point(false);
    let hash = keccak256(&uncompressed.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}
