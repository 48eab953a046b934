pub mod graph;
pub mod builder;
pub mod rules;
pub mod population;

// Public re-exports
pub use graph::{Graph, GraphDocument, NodeDocument};
pub use builder::{build_graph, GraphBuilder};
pub use rules::{Comparator, Derivation, EvaluationReport, Rule, RuleEngine, RuleSet};
pub use population::{aggregate, finding_labels, CollectiveGraph, PopulationAggregator};
