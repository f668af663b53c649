//! Operational gRPC surface, separate from the worker's own retry loop:
//! a single RPC an operator calls by hand when a wallet's queue is stuck
//! behind a row the chain will never mine (e.g. an orphaned nonce from a
//! manual intervention).

mod generated;
mod metrics;
mod service;
#[cfg(test)]
mod tests;

pub use generated::meta_transaction_service_server::MetaTransactionServiceServer;
pub use generated::CleanStuckMetaTransactionsResponse;
pub use metrics::{AdminMetrics, GrpcMetricsLayer};
pub use service::AdminService;
