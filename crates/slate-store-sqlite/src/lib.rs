//! SQLite backend for the season schedule importer.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The sprocket, mledb and mledb_bridge
//! schemas live in three attached databases so table names read the same as
//! on the production server.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SqliteStore, SqliteTx};
