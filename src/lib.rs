//! Meta-transaction relay: advances user-authored contract-call intents
//! through an EVM chain via a pool of relayer wallets.
//!
//! # Modules
//!
//! - [`config`] — the environment-driven settings surface and CLI surface.
//! - [`supervisor`] — boots every subsystem and owns the shutdown sequence.
//! - [`monitoring`] — the health/metrics HTTP surface.
//! - [`telemetry`] — `tracing` + optional OpenTelemetry OTLP setup.
//! - [`sig_down`] — SIGTERM/SIGINT to `CancellationToken` adapter.
//!
//! The actual domain logic — the ticker worker, chain client, signer,
//! request store, and Kafka adapters — lives in the `relay-*` workspace
//! crates; this crate only wires them together into a runnable daemon.

pub mod config;
pub mod monitoring;
pub mod sig_down;
pub mod supervisor;
pub mod telemetry;
