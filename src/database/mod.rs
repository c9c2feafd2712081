//! Database query support via DuckDB
//!
//! This module provides a [`crate::query::Query`] implementation over
//! tables of an embedded DuckDB database.

mod engine;

pub use engine::{DatabaseEngine, DuckDbQuery};
