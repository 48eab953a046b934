// lib/src/engine/population.rs

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use models::properties::get_integer;
use models::{Edge, Node, NodeId, NodeType, Relation};

use crate::engine::Graph;

/// Population-level co-occurrence graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectiveGraph {
    /// Number of per-patient graphs aggregated, including those without findings.
    pub patients: usize,
    /// Finding nodes with `support`, `CO_OCCURS_WITH` edges with `weight`.
    pub graph: Graph,
}

impl CollectiveGraph {
    /// Support of a finding label, 0 if it never occurred.
    pub fn support(&self, label: &str) -> u64 {
        NodeId::new(NodeType::Finding, label)
            .ok()
            .and_then(|id| self.graph.node(&id))
            .and_then(|n| get_integer(&n.props, "support"))
            .and_then(|support| u64::try_from(support).ok())
            .unwrap_or(0)
    }

    /// Co-occurrence weight of an unordered label pair, 0 if absent.
    pub fn weight(&self, a: &str, b: &str) -> u64 {
        let (Ok(a), Ok(b)) = (
            NodeId::new(NodeType::Finding, a),
            NodeId::new(NodeType::Finding, b),
        ) else {
            return 0;
        };
        let (src, dst) = if a <= b { (a, b) } else { (b, a) };
        self.graph
            .edges_from(&src, Relation::CoOccursWith)
            .find(|e| e.dst == dst)
            .and_then(|e| e.weight)
            .unwrap_or(0)
    }
}

/// Finding labels a patient graph exhibits: targets of `HAS_FINDING` edges
/// that resolve to an existing Finding node under a `Finding/` id. The label
/// is the node's `label` prop, or the id's local part when that is missing.
/// Dangling or mistyped edges count as no finding.
pub fn finding_labels(graph: &Graph) -> BTreeSet<String> {
    graph
        .edges()
        .iter()
        .filter(|e| e.rel == Relation::HasFinding)
        .filter_map(|e| match graph.node(&e.dst) {
            Some(node) if node.node_type == NodeType::Finding && e.dst.node_type() == NodeType::Finding => {
                Some(node)
            }
            Some(_) | None => {
                debug!("Ignoring HAS_FINDING edge {} -> {} without a Finding target", e.src, e.dst);
                None
            }
        })
        .map(|node| {
            node.get_str("label")
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| node.id.local())
                .to_string()
        })
        .collect()
}

/// Merges per-patient graphs into a single co-occurrence graph.
#[derive(Debug, Default)]
pub struct PopulationAggregator {
    patients: usize,
    support: BTreeMap<String, u64>,
    weights: BTreeMap<(String, String), u64>,
}

impl PopulationAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one patient. Each label contributes at most once, however many
    /// observations triggered it.
    pub fn add_patient(&mut self, graph: &Graph) -> &mut Self {
        self.patients += 1;
        let labels: Vec<String> = finding_labels(graph).into_iter().collect();

        for (i, a) in labels.iter().enumerate() {
            *self.support.entry(a.clone()).or_default() += 1;
            // labels are sorted, so (a, b) is already the canonical pair order
            for b in &labels[i + 1..] {
                *self.weights.entry((a.clone(), b.clone())).or_default() += 1;
            }
        }
        self
    }

    /// Emits the collective graph: one Finding node per label with support
    /// >= 1, one edge per co-occurring pair from the lexicographically
    /// smaller label to the larger. Edges are ordered by weight, heaviest
    /// first, then by pair.
    pub fn finish(self) -> CollectiveGraph {
        let mut graph = Graph::new();

        for (label, support) in &self.support {
            match NodeId::new(NodeType::Finding, label) {
                Ok(id) => graph.add_node(
                    Node::new(id)
                        .with_property("label", label.as_str())
                        .with_property("support", *support),
                ),
                Err(e) => warn!("Skipping finding label {:?}: {}", label, e),
            }
        }

        let mut pairs: Vec<_> = self.weights.into_iter().collect();
        pairs.sort_by_key(|((a, b), weight)| (Reverse(*weight), a.clone(), b.clone()));

        for ((a, b), weight) in pairs {
            if let (Ok(src), Ok(dst)) = (
                NodeId::new(NodeType::Finding, &a),
                NodeId::new(NodeType::Finding, &b),
            ) {
                graph.add_edge(Edge::new(src, Relation::CoOccursWith, dst).with_weight(weight));
            }
        }

        CollectiveGraph {
            patients: self.patients,
            graph,
        }
    }
}

/// Aggregates graphs in the order given.
pub fn aggregate<'a>(graphs: impl IntoIterator<Item = &'a Graph>) -> CollectiveGraph {
    let mut aggregator = PopulationAggregator::new();
    for graph in graphs {
        aggregator.add_patient(graph);
    }
    aggregator.finish()
}
