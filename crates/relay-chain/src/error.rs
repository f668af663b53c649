use alloy_primitives::Bytes;
use alloy_transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("chain rpc error: {0}")]
    Other(String),
}

/// Extracts hex-encoded revert data from a structured JSON-RPC error, if
/// the error carries one. Used by the estimation branch to distinguish a
/// terminal revert (decode the `data` field, emit `Failed`, delete the
/// row) from a transient transport failure (retry next tick).
pub fn decode_structured_error(err: &ChainError) -> Option<Bytes> {
    let ChainError::Transport(transport) = err else {
        return None;
    };
    let resp = transport.as_error_resp()?;
    let data = resp.data.as_ref()?;
    let raw = data.get().trim().trim_matches('"');
    let raw = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(raw).ok().map(Bytes::from)
}
