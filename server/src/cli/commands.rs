// server/src/cli/commands.rs

// Command-line arguments and subcommands for the clinical-graph CLI.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clinical-graph")]
#[command(version = "0.1.0")]
#[command(about = "Map FHIR bundles to semantic graphs and aggregate finding co-occurrence")]
pub struct CliArgs {
    /// TOML configuration file (defaults to ./clinical_graph.toml when present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Commands {
    /// Map one patient bundle to a graph document
    Map {
        #[arg(value_name = "BUNDLE")]
        bundle: PathBuf,
        #[arg(long, short = 'o', default_value = "graph.json")]
        out: PathBuf,
    },
    /// Aggregate a directory of bundles into a co-occurrence graph
    Population {
        /// Directory of bundle files (overrides bundles_dir from the config)
        #[arg(long, short = 'b')]
        bundles: Option<PathBuf>,
        /// Output directory (overrides out_dir from the config)
        #[arg(long, short = 'o')]
        out_dir: Option<PathBuf>,
        /// Map bundles on all cores
        #[arg(long)]
        parallel: bool,
    },
}
