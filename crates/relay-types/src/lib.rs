//! Shared data model for the meta-transaction processor.
//!
//! This crate has no knowledge of Postgres, Kafka, or any RPC transport — it
//! exists so the store, chain client, worker, and Kafka adapters can all
//! agree on what a [`Request`], a [`Block`], and a [`StatusEvent`] are
//! without depending on each other.

pub mod block;
pub mod envelope;
pub mod event;
pub mod request;

pub use block::Block;
pub use envelope::{CloudEvent, RequestEnvelopeData};
pub use event::{Log, StatusEvent, StatusEventData, TransactionPayload};
pub use request::{NewRequest, Request};
