// lib/src/engine/graph.rs

use std::collections::{BTreeMap, HashMap};

use log::warn;
use models::{Edge, Node, NodeId, NodeType, Properties, Relation};
use serde::{Deserialize, Serialize};

use crate::errors::GraphResult;

/// Typed nodes keyed by id plus an ordered edge list. Knows nothing about the
/// clinical domain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,

    // For fast traversal (adjacency list)
    outbound: HashMap<NodeId, Vec<usize>>, // from node id -> edge positions, in insertion order
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the node, or merges its props into the node already stored
    /// under the same id (later values win on key collision).
    pub fn add_node(&mut self, node: Node) {
        match self.nodes.get_mut(&node.id) {
            Some(existing) => existing.merge_props(node.props),
            None => {
                self.nodes.insert(node.id.clone(), node);
            }
        }
    }

    /// Appends unconditionally. Callers that need set semantics check
    /// `contains_edge` first.
    pub fn add_edge(&mut self, edge: Edge) {
        self.outbound
            .entry(edge.src.clone())
            .or_default()
            .push(self.edges.len());
        self.edges.push(edge);
    }

    pub fn contains_edge(&self, src: &NodeId, dst: &NodeId, rel: Relation) -> bool {
        self.edges_from(src, rel).any(|e| &e.dst == dst)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.node_type == node_type)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edges of `src` with relation `rel`, in insertion order.
    pub fn edges_from<'a>(
        &'a self,
        src: &NodeId,
        rel: Relation,
    ) -> impl Iterator<Item = &'a Edge> + use<'a> {
        self.outbound
            .get(src)
            .map(|positions| positions.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.edges[i])
            .filter(move |e| e.rel == rel)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// The flat `{ nodes, edges }` document.
    pub fn serialize(&self) -> GraphDocument {
        GraphDocument {
            nodes: self
                .nodes
                .iter()
                .map(|(id, node)| {
                    (
                        id.clone(),
                        NodeDocument {
                            node_type: node.node_type,
                            props: node.props.clone(),
                        },
                    )
                })
                .collect(),
            edges: self.edges.clone(),
        }
    }

    /// Rebuilds a graph from a previously written document. Nodes whose
    /// `type` disagrees with their id prefix are dropped.
    pub fn from_document(document: GraphDocument) -> Self {
        let mut graph = Graph::new();
        for (id, doc) in document.nodes {
            if doc.node_type != id.node_type() {
                warn!("Dropping node {} declared as {}", id, doc.node_type);
                continue;
            }
            graph.add_node(Node {
                id,
                node_type: doc.node_type,
                props: doc.props,
            });
        }
        for edge in document.edges {
            graph.add_edge(edge);
        }
        graph
    }

    pub fn to_json_pretty(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(&self.serialize())?)
    }
}

/// Serialized form of a graph:
///
/// ```json
/// { "nodes": { "<Type>/<id>": { "type": "<Type>", "props": {} } },
///   "edges": [ { "src": "<id>", "dst": "<id>", "rel": "<REL>", "weight": 1 } ] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: BTreeMap<NodeId, NodeDocument>,
    pub edges: Vec<Edge>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub props: Properties,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::parse(s).unwrap()
    }

    #[test]
    fn add_node_merges_props_instead_of_duplicating() {
        let mut graph = Graph::new();
        graph.add_node(Node::new(id("Patient/p1")).with_property("name", "A Doe"));
        graph.add_node(
            Node::new(id("Patient/p1"))
                .with_property("name", "Ann Doe")
                .with_property("gender", "female"),
        );

        assert_eq!(graph.node_count(), 1);
        let node = graph.node(&id("Patient/p1")).unwrap();
        assert_eq!(node.get_str("name"), Some("Ann Doe"));
        assert_eq!(node.get_str("gender"), Some("female"));
    }

    #[test]
    fn add_edge_appends_duplicates_in_order() {
        let mut graph = Graph::new();
        let obs = id("Observation/o1");
        let pat = id("Patient/p1");
        graph.add_edge(Edge::new(obs.clone(), Relation::HasSubject, pat.clone()));
        graph.add_edge(Edge::new(obs.clone(), Relation::HasCode, id("Code/s|c")));
        graph.add_edge(Edge::new(obs.clone(), Relation::HasSubject, pat.clone()));

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges_from(&obs, Relation::HasSubject).count(), 2);
        assert!(graph.contains_edge(&obs, &pat, Relation::HasSubject));
        assert!(!graph.contains_edge(&pat, &obs, Relation::HasSubject));
        assert_eq!(graph.edges_from(&pat, Relation::HasSubject).count(), 0);
        assert_eq!(graph.edges()[1].rel, Relation::HasCode);
    }

    #[test]
    fn serialize_renders_flat_document() {
        let mut graph = Graph::new();
        graph.add_node(Node::new(id("Patient/p1")).with_property("gender", "male"));
        graph.add_node(Node::new(id("Finding/Fever")).with_property("label", "Fever"));
        graph.add_edge(Edge::new(id("Patient/p1"), Relation::HasFinding, id("Finding/Fever")));

        let json: serde_json::Value = serde_json::to_value(graph.serialize()).unwrap();
        assert_eq!(json["nodes"]["Patient/p1"]["type"], "Patient");
        assert_eq!(json["nodes"]["Patient/p1"]["props"]["gender"], "male");
        assert_eq!(json["nodes"]["Finding/Fever"]["props"]["label"], "Fever");
        assert_eq!(json["edges"][0]["src"], "Patient/p1");
        assert_eq!(json["edges"][0]["dst"], "Finding/Fever");
        assert_eq!(json["edges"][0]["rel"], "HAS_FINDING");
        assert!(json["edges"][0].get("weight").is_none());
    }

    #[test]
    fn document_rebuilds_an_equal_graph() {
        let mut graph = Graph::new();
        graph.add_node(Node::new(id("Observation/o1")).with_property("value", "38.5 Celsius"));
        graph.add_node(Node::new(id("Patient/p1")));
        graph.add_edge(Edge::new(id("Observation/o1"), Relation::HasSubject, id("Patient/p1")));

        let text = graph.to_json_pretty().unwrap();
        let document: GraphDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(Graph::from_document(document), graph);
    }

    #[test]
    fn document_nodes_must_match_their_id_prefix() {
        let document: GraphDocument = serde_json::from_value(serde_json::json!({
            "nodes": {
                "Patient/p1": {"type": "Finding", "props": {"label": "p1"}},
                "Finding/Fever": {"type": "Finding", "props": {"label": "Fever"}}
            },
            "edges": [{"src": "Patient/p1", "dst": "Finding/Fever", "rel": "HAS_FINDING"}]
        }))
        .unwrap();
        let graph = Graph::from_document(document);

        assert!(graph.node(&id("Patient/p1")).is_none());
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
    }
}
