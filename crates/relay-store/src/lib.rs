//! Durable storage for meta-transaction requests.
//!
//! [`RequestStore`] is the trait the worker programs against; [`PostgresRequestStore`]
//! is the production implementation. [`migrate_up`]/[`migrate_down_to`] drive
//! the crate's own versioned migrations independently of the daemon process.

mod error;
mod migrations;
mod numeric;
mod postgres;
mod store;

pub use error::StoreError;
pub use migrations::{migrate_down_to, migrate_up};
pub use postgres::PostgresRequestStore;
pub use store::RequestStore;
