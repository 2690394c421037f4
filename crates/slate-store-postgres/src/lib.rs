//! PostgreSQL backend for the season schedule importer.
//!
//! Talks to the production server, where the sprocket, mledb and
//! mledb_bridge schemas already exist. Nothing here creates or migrates
//! tables.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{PostgresStore, PostgresTx};
