// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! JSON:API pager CLI
//!
//! Command-line interface for paging DuckDB tables as JSON:API documents

use clap::Parser;
use jsonapi_pager::cli::{Cli, Runner};

fn main() {
    let cli = Cli::parse();

    // Initialize logging; documents go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(cli.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
