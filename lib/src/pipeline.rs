// lib/src/pipeline.rs

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::engine::{aggregate, build_graph, CollectiveGraph, Graph, RuleEngine};
use crate::errors::{GraphError, GraphResult};
use crate::ingest::{normalize, Bundle};

/// Per-patient graphs, in input order, and their aggregate.
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub graphs: Vec<Graph>,
    pub collective: CollectiveGraph,
}

pub fn parse_bundle(text: &str) -> GraphResult<Bundle> {
    Bundle::from_json_str(text)
}

pub fn load_bundle(path: &Path) -> GraphResult<Bundle> {
    let text = fs::read_to_string(path).map_err(|source| GraphError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bundle(&text).map_err(|e| match e {
        GraphError::InvalidBundle(reason) => {
            GraphError::InvalidBundle(format!("{}: {}", path.display(), reason))
        }
        other => other,
    })
}

/// Normalize, build and evaluate one patient's bundle.
pub fn map_bundle(bundle: &Bundle, engine: &RuleEngine) -> Graph {
    let normalized = normalize(bundle);
    if normalized.skipped > 0 {
        warn!("Skipped {} malformed record(s)", normalized.skipped);
    }
    let mut graph = build_graph(&normalized.facts);
    let report = engine.evaluate(&mut graph);
    debug!(
        "Mapped bundle: {} nodes, {} edges, {} rule firing(s)",
        graph.node_count(),
        graph.edge_count(),
        report.derivations.len()
    );
    graph
}

/// Maps every bundle. With `parallel`, bundles are mapped on the rayon pool;
/// the result keeps input order either way.
pub fn map_bundles(bundles: &[Bundle], engine: &RuleEngine, parallel: bool) -> Vec<Graph> {
    if parallel {
        bundles.par_iter().map(|b| map_bundle(b, engine)).collect()
    } else {
        bundles.iter().map(|b| map_bundle(b, engine)).collect()
    }
}

pub fn build_population(bundles: &[Bundle], engine: &RuleEngine, parallel: bool) -> Population {
    let graphs = map_bundles(bundles, engine, parallel);
    let collective = aggregate(&graphs);
    info!(
        "Aggregated {} patient(s) into {} finding(s) and {} co-occurrence edge(s)",
        collective.patients,
        collective.graph.node_count(),
        collective.graph.edge_count()
    );
    Population { graphs, collective }
}

/// `*.json` files directly inside `dir`, sorted by file name.
pub fn bundle_files(dir: &Path) -> GraphResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| GraphError::ReadError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(GraphError::NoBundles(dir.to_path_buf()));
    }
    Ok(files)
}

pub fn load_bundles(dir: &Path) -> GraphResult<Vec<Bundle>> {
    bundle_files(dir)?.iter().map(|path| load_bundle(path)).collect()
}
