// lib/src/lib.rs
//
// Clinical records to semantic graphs: normalize a patient's records, build
// the structural graph, derive findings with threshold rules, and aggregate
// many patients into a finding co-occurrence graph.

pub mod config;
pub mod engine;
pub mod errors;
pub mod ingest;
pub mod pipeline;

pub use models::{Edge, Node, NodeId, NodeType, PropertyValue, Relation};

pub use crate::config::AppConfig;
pub use crate::engine::{
    aggregate, CollectiveGraph, Graph, GraphDocument, PopulationAggregator, Rule, RuleEngine, RuleSet,
};
pub use crate::errors::{GraphError, GraphResult};
pub use crate::ingest::Bundle;
pub use crate::pipeline::{build_population, load_bundle, load_bundles, map_bundle, Population};
