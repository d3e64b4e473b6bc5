//! crates/storage-adapters/src/lib.rs
//!
//! Implementations of the `domains` storage ports.
//!
//! - [`memory::InMemoryStore`]: always compiled; backs tests and local runs.
//! - [`postgres::PgStore`]: feature `db-postgres`; the production store.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::InMemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;
