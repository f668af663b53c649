use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("kms signing request failed: {0}")]
    Kms(#[from] Box<aws_sdk_kms::error::SdkError<aws_sdk_kms::operation::sign::SignError>>),

    #[error("kms get-public-key request failed: {0}")]
    KmsPublicKey(
        #[from] Box<aws_sdk_kms::error::SdkError<aws_sdk_kms::operation::get_public_key::GetPublicKeyError>>,
    ),

    #[error("kms response missing {0}")]
    KmsMissingField(&'static str),

    #[error("malformed DER in kms response: {0}")]
    Der(String),

    #[error("couldn't choose a recovery id that matches the signer's address")]
    NoMatchingRecoveryId,
}
