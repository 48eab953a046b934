// server/src/cli/handlers.rs

// Handlers for the clinical-graph subcommands.

use anyhow::{Context, Result};
use clinical_graph::{build_population, load_bundle, load_bundles, map_bundle, AppConfig};
use log::info;
use std::path::Path;

use crate::cli::export::{write_cooccurrence_csv, write_graph_json, COOCCURRENCE_FILE, META_GRAPH_FILE};

/// Maps a single bundle and writes its graph document to `out`.
pub fn handle_map(config: &AppConfig, bundle: &Path, out: &Path) -> Result<()> {
    let engine = config.rule_engine().context("Invalid rule configuration")?;
    let bundle_doc = load_bundle(bundle).with_context(|| format!("Failed to load bundle {}", bundle.display()))?;

    let graph = map_bundle(&bundle_doc, &engine);
    write_graph_json(&graph, out)?;

    info!(
        "Wrote {} ({} nodes, {} edges)",
        out.display(),
        graph.node_count(),
        graph.edge_count()
    );
    println!("Wrote {} with {} nodes and {} edges", out.display(), graph.node_count(), graph.edge_count());
    Ok(())
}

/// Aggregates every bundle in `bundles` and writes the meta graph and the
/// co-occurrence table into `out_dir`.
pub fn handle_population(config: &AppConfig, bundles: &Path, out_dir: &Path, parallel: bool) -> Result<()> {
    let engine = config.rule_engine().context("Invalid rule configuration")?;
    let bundle_docs =
        load_bundles(bundles).with_context(|| format!("Failed to load bundles from {}", bundles.display()))?;
    info!("Loaded {} bundle(s) from {}", bundle_docs.len(), bundles.display());

    let population = build_population(&bundle_docs, &engine, parallel);
    let collective = &population.collective;

    let meta_path = out_dir.join(META_GRAPH_FILE);
    let csv_path = out_dir.join(COOCCURRENCE_FILE);
    write_graph_json(&collective.graph, &meta_path)?;
    write_cooccurrence_csv(collective, &csv_path)?;

    println!(
        "Aggregated {} patient(s): {} finding(s), {} co-occurrence edge(s)",
        collective.patients,
        collective.graph.node_count(),
        collective.graph.edge_count()
    );
    println!("Wrote {} and {}", meta_path.display(), csv_path.display());
    Ok(())
}
