//! CLI commands and argument parsing

use crate::types::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// JSON:API pager CLI
#[derive(Parser, Debug)]
#[command(name = "jsonapi-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Resource catalog file (YAML)
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    /// DuckDB database file (in-memory when omitted)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Log level (overrides --verbose)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective log level for the subscriber
    pub fn log_level(&self) -> tracing::Level {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => tracing::Level::DEBUG,
            (None, false) => tracing::Level::INFO,
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one page of a resource collection
    Page {
        /// Resource type from the catalog
        resource: String,

        /// Request query string, e.g. `page[number]=2&page[size]=3&sort=-title`
        #[arg(short, long, default_value = "")]
        query: String,

        /// Base URL for pagination links (defaults to the catalog base URL)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Render a single resource by id
    Show {
        /// Resource type from the catalog
        resource: String,

        /// Resource id
        id: String,

        /// Request query string, e.g. `filter[published]=true`
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// List configured resources
    Resources,

    /// List tables in the database
    Tables,

    /// Validate the catalog against the database
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
