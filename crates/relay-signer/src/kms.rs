use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use aws_sdk_kms::Client;
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::types::{MessageType, SigningAlgorithmSpec};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use spki::SubjectPublicKeyInfoRef;
use tracing::instrument;

use crate::address::address_from_verifying_key;
use crate::{RecoverableSignature, RemoteSigner, SignerError};

/// A signer backed by an asymmetric ECC_SECG_P256K1 key held in AWS KMS.
///
/// KMS never returns a recoverable signature, nor a low-S one: this signer
/// reconstructs the recovery id by brute-force trying `v = 0` and `v = 1`
/// against the public key fetched once at construction time, and
/// canonicalizes `s` to the lower half of the curve order so the resulting
/// signature matches what other Ethereum tooling expects.
pub struct KmsSigner {
    client: Client,
    key_id: String,
    address: Address,
    verifying_key: VerifyingKey,
}

impl KmsSigner {
    /// Fetches the public key for `key_id` from KMS and derives its address.
    pub async fn new(client: Client, key_id: impl Into<String>) -> Result<Self, SignerError> {
        let key_id = key_id.into();
        let response = client
            .get_public_key()
            .key_id(&key_id)
            .send()
            .await
            .map_err(|e| SignerError::KmsPublicKey(Box::new(e)))?;
        let der = response.public_key.ok_or(SignerError::KmsMissingField("PublicKey"))?;

        let spki = SubjectPublicKeyInfoRef::try_from(der.as_ref())
            .map_err(|e| SignerError::Der(format!("subject public key info: {e}")))?;
        let verifying_key = VerifyingKey::from_sec1_bytes(spki.subject_public_key.raw_bytes())
            .map_err(|e| SignerError::Der(format!("ecdsa public key point: {e}")))?;
        let address = address_from_verifying_key(&verifying_key);

        Ok(Self { client, key_id, address, verifying_key })
    }
}

#[async_trait]
impl RemoteSigner for KmsSigner {
    fn address(&self) -> Address {
        self.address
    }

    #[instrument(skip(self), fields(key_id = %self.key_id, address = %self.address))]
    async fn sign(&self, digest: B256) -> Result<RecoverableSignature, SignerError> {
        let response = self
            .client
            .sign()
            .key_id(&self.key_id)
            .message(Blob::new(digest.as_slice()))
            .message_type(MessageType::Digest)
            .signing_algorithm(SigningAlgorithmSpec::EcdsaSha256)
            .send()
            .await
            .map_err(|e| SignerError::Kms(Box::new(e)))?;
        let der = response.signature.ok_or(SignerError::KmsMissingField("Signature"))?;

        let signature =
            Signature::from_der(der.as_ref()).map_err(|e| SignerError::Der(format!("ecdsa signature: {e}")))?;
        // KMS never returns a low-S signature; canonicalize so downstream
        // validators (and our own hash-consistency check, I4) see the same
        // signature every time this digest is re-signed.
        let signature = signature.normalize_s().unwrap_or(signature);

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());

        for v in 0u8..=1 {
            let recovery_id = RecoveryId::from_byte(v).expect("0 and 1 are valid recovery ids");
            if let Ok(recovered) = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
                && recovered == self.verifying_key
            {
                out[64] = v;
                return Ok(out);
            }
        }
        Err(SignerError::NoMatchingRecoveryId)
    }
}
