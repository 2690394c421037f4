//! Core types and the import pipeline for the season schedule importer.
//!
//! This crate is deliberately free of database dependencies. Storage backends
//! (`slate-store-sqlite`, `slate-store-postgres`) implement the traits in
//! [`store`]; the binary wires one of them into [`import::run_import`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod entity;
pub mod error;
pub mod franchise;
pub mod graph;
pub mod import;
pub mod league;
pub mod schedule;
pub mod store;

pub use error::{Error, Result};
