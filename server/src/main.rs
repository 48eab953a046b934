// server/src/main.rs

// Entry point for the clinical-graph command line tool.

use anyhow::Result;
use clinical_cli::cli::start_cli;

fn main() -> Result<()> {
    // RUST_LOG controls verbosity; warnings about skipped records show by default
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    start_cli()
}
