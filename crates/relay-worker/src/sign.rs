use alloy_consensus::{SignableTransaction, TxLegacy};
use alloy_primitives::{Address, Bytes, PrimitiveSignature as Signature, TxKind, U256};
use alloy_rlp::Encodable;
use relay_signer::RemoteSigner;

use crate::error::WorkerError;

/// Builds and signs a legacy (non-EIP-1559) transaction, returning its
/// hash and the raw RLP bytes ready for `send_raw_transaction`.
pub async fn sign_legacy_tx(
    signer: &dyn RemoteSigner,
    chain_id: u64,
    nonce: u64,
    gas_price: U256,
    gas_limit: u64,
    to: Address,
    data: Bytes,
) -> Result<(alloy_primitives::B256, Bytes), WorkerError> {
    let tx = TxLegacy {
        chain_id: Some(chain_id),
        nonce,
        gas_price: gas_price.to::<u128>(),
        gas_limit,
        to: TxKind::Call(to),
        value: U256::ZERO,
        input: data,
    };
    let sighash = tx.signature_hash();
    let raw = signer.sign(sighash).await?;
    let signature = Signature::from_bytes_and_parity(&raw[..64], raw[64] != 0);
    let signed = tx.into_signed(signature);

    let mut encoded = Vec::new();
    signed.encode(&mut encoded);
    Ok((*signed.hash(), Bytes::from(encoded)))
}
