//! SQLite backend for the ApexHash document store.
//!
//! Documents are stored as JSON bodies in a single table, partitioned by a
//! logical database name and a collection name. Wraps [`tokio_rusqlite`] so
//! all database access runs on a dedicated thread without blocking the async
//! runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
