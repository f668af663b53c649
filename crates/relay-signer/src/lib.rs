//! Remote ECDSA signing over secp256k1.
//!
//! A relayer wallet's private key never needs to live in this process: the
//! [`RemoteSigner`] trait abstracts over "sign this digest" so the worker
//! can run against a [`LocalSigner`] (a key held in memory, for development
//! and tests) or a [`KmsSigner`] (a key held in AWS KMS, for production)
//! without caring which.

mod address;
mod error;
mod kms;
mod local;

pub use error::SignerError;
pub use kms::KmsSigner;
pub use local::LocalSigner;

use alloy_primitives::{Address, B256};
use async_trait::async_trait;

/// A 65-byte `r || s || v` secp256k1 signature, `v` in `{0, 1}`.
pub type RecoverableSignature = [u8; 65];

/// Something that can produce a recoverable secp256k1 signature over a
/// 32-byte digest without exposing the private key to the caller.
#[async_trait]
pub trait RemoteSigner: Send + Sync {
    /// The Ethereum address this signer signs for.
    fn address(&self) -> Address;

    /// Signs `digest` (expected to already be the keccak256 hash of the
    /// RLP-encoded unsigned transaction) and returns a low-S, recoverable
    /// signature.
    async fn sign(&self, digest: B256) -> Result<RecoverableSignature, SignerError>;
}
