//! The per-wallet ticker worker: the system's core control loop.
//!
//! One [`TickerWorker`] owns exactly one relayer wallet's queue and is the
//! only writer to that wallet's rows — the single-flight nonce invariant
//! depends on the supervisor never spawning two workers for the same
//! wallet index.

mod error;
mod metrics;
mod sign;
#[cfg(test)]
mod tests;
mod worker;

pub use error::WorkerError;
pub use metrics::WorkerMetrics;
pub use sign::sign_legacy_tx;
pub use worker::{TickerWorker, WorkerConfig};
