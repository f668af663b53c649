use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use k256::ecdsa::SigningKey;

use crate::address::address_from_verifying_key;
use crate::{RecoverableSignature, RemoteSigner, SignerError};

/// A signer backed by a private key held in process memory.
///
/// Exists for local development and integration tests; production
/// deployments use [`crate::KmsSigner`] so the key never touches this
/// process.
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl LocalSigner {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignerError> {
        let key = SigningKey::from_slice(bytes).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        let address = address_from_verifying_key(key.verifying_key());
        Ok(Self { key, address })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, SignerError> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(hex_str).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

#[async_trait]
impl RemoteSigner for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, digest: B256) -> Result<RecoverableSignature, SignerError> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signs_and_recovers_to_its_own_address() {
        let signer = LocalSigner::from_bytes(&[7u8; 32]).unwrap();
        let digest = B256::repeat_byte(0x42);
        let sig = signer.sign(digest).await.unwrap();

        let recovery_id = k256::ecdsa::RecoveryId::from_byte(sig[64]).unwrap();
        let signature = k256::ecdsa::Signature::from_slice(&sig[..64]).unwrap();
        let recovered =
            k256::ecdsa::VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id).unwrap();
        assert_eq!(recovered, *signer.key.verifying_key());
    }
}
