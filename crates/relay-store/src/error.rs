use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("request {0} not found")]
    NotFound(String),

    #[error("no requests in the store")]
    Empty,
}
