// server/src/cli/export.rs

// Writers for the files produced by the CLI.

use anyhow::{Context, Result};
use clinical_graph::{CollectiveGraph, Graph};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const META_GRAPH_FILE: &str = "meta_graph.json";
pub const COOCCURRENCE_FILE: &str = "cooccurrence.csv";

/// Writes a graph document as pretty JSON, creating parent directories.
pub fn write_graph_json(graph: &Graph, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let text = graph.to_json_pretty()?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Renders the co-occurrence edge list as `source,target,weight` rows of
/// Finding node ids, in the collective graph's edge order.
pub fn cooccurrence_csv(collective: &CollectiveGraph) -> String {
    let mut out = String::from("source,target,weight\n");
    for edge in collective.graph.edges() {
        let _ = writeln!(
            out,
            "{},{},{}",
            csv_field(edge.src.as_str()),
            csv_field(edge.dst.as_str()),
            edge.weight.unwrap_or(0)
        );
    }
    out
}

pub fn write_cooccurrence_csv(collective: &CollectiveGraph, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, cooccurrence_csv(collective)).with_context(|| format!("Failed to write {}", path.display()))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinical_graph::{aggregate, Edge, Node, NodeId, NodeType, Relation};

    fn patient(local: &str, findings: &[&str]) -> Graph {
        let id = NodeId::new(NodeType::Patient, local).unwrap();
        let mut graph = Graph::new();
        graph.add_node(Node::new(id.clone()));
        for label in findings {
            let finding = NodeId::new(NodeType::Finding, label).unwrap();
            graph.add_node(Node::new(finding.clone()).with_property("label", *label));
            graph.add_edge(Edge::new(id.clone(), Relation::HasFinding, finding));
        }
        graph
    }

    #[test]
    fn csv_lists_pairs_heaviest_first() {
        let graphs = vec![
            patient("p1", &["Fever", "Tachycardia", "Hypoxemia"]),
            patient("p2", &["Fever", "Tachycardia"]),
        ];
        let csv = cooccurrence_csv(&aggregate(&graphs));
        assert_eq!(
            csv,
            "source,target,weight\n\
             Finding/Fever,Finding/Tachycardia,2\n\
             Finding/Fever,Finding/Hypoxemia,1\n\
             Finding/Hypoxemia,Finding/Tachycardia,1\n"
        );
    }

    #[test]
    fn csv_quotes_awkward_ids() {
        assert_eq!(csv_field("Finding/Fever"), "Finding/Fever");
        assert_eq!(csv_field("Finding/Pain, chest"), "\"Finding/Pain, chest\"");
        assert_eq!(csv_field("so-called \"fever\""), "\"so-called \"\"fever\"\"\"");
    }

    #[test]
    fn empty_population_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(COOCCURRENCE_FILE);
        write_cooccurrence_csv(&CollectiveGraph::default(), &path).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "source,target,weight\n");
    }

    #[test]
    fn graph_json_is_a_node_map_and_edge_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        write_graph_json(&patient("p1", &["Fever"]), &path).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["nodes"]["Patient/p1"]["type"], "Patient");
        assert_eq!(json["nodes"]["Finding/Fever"]["props"]["label"], "Fever");
        assert_eq!(json["edges"][0]["rel"], "HAS_FINDING");
        assert!(json["edges"][0].get("weight").is_none());
    }
}
