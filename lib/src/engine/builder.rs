// lib/src/engine/builder.rs

use models::{Edge, Fact, Relation, ToNode};

use crate::engine::Graph;

/// Turns normalized facts into structural nodes and edges.
///
/// Nodes are merged by id, edges are appended, so feeding the same facts
/// twice keeps the node set but doubles the edges.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue building on an existing graph.
    pub fn with_graph(graph: Graph) -> Self {
        GraphBuilder { graph }
    }

    pub fn add_fact(&mut self, fact: &Fact) -> &mut Self {
        match fact {
            Fact::Patient(patient) => {
                self.graph.add_node(patient.to_node());
            }
            Fact::Observation(observation) => {
                self.graph.add_node(observation.to_node());
                self.graph.add_edge(Edge::new(
                    observation.id.clone(),
                    Relation::HasSubject,
                    observation.subject.clone(),
                ));
                for code in &observation.codes {
                    self.graph
                        .add_edge(Edge::new(observation.id.clone(), Relation::HasCode, code.clone()));
                }
            }
            Fact::Code(code) => {
                self.graph.add_node(code.to_node());
            }
        }
        self
    }

    pub fn add_facts<'a>(&mut self, facts: impl IntoIterator<Item = &'a Fact>) -> &mut Self {
        for fact in facts {
            self.add_fact(fact);
        }
        self
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}

/// Builds a fresh graph from facts.
pub fn build_graph(facts: &[Fact]) -> Graph {
    let mut builder = GraphBuilder::new();
    builder.add_facts(facts);
    builder.build()
}
