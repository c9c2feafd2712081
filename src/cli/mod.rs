//! CLI module
//!
//! Command-line interface for paging resources stored in DuckDB.
//!
//! # Commands
//!
//! - `page` - Render one page of a collection as a JSON:API document
//! - `show` - Render a single resource
//! - `resources` - List configured resources
//! - `tables` - List database tables
//! - `validate` - Check the catalog against the database

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
