use thiserror::Error;

/// Every tick error is non-fatal: the supervisor counts it and the next
/// tick retries from whatever state the store holds.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("chain rpc error: {0}")]
    Chain(#[from] relay_chain::ChainError),

    #[error("store error: {0}")]
    Store(#[from] relay_store::StoreError),

    #[error("signer error: {0}")]
    Signer(#[from] relay_signer::SignerError),
}
