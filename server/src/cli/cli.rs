// server/src/cli/cli.rs

use anyhow::{Context, Result};
use clap::Parser;
use clinical_graph::AppConfig;

use crate::cli::commands::{CliArgs, Commands};
use crate::cli::handlers::{handle_map, handle_population};

pub fn start_cli() -> Result<()> {
    run(CliArgs::parse())
}

pub fn run(args: CliArgs) -> Result<()> {
    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    match args.command {
        Commands::Map { bundle, out } => handle_map(&config, &bundle, &out),
        Commands::Population { bundles, out_dir, parallel } => {
            let bundles = bundles.unwrap_or_else(|| config.bundles_dir.clone());
            let out_dir = out_dir.unwrap_or_else(|| config.out_dir.clone());
            handle_population(&config, &bundles, &out_dir, parallel || config.parallel)
        }
    }
}
