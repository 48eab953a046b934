// models/src/medical/observation.rs
use crate::{Node, NodeId, ToNode};

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationFact {
    pub id: NodeId,
    pub subject: NodeId, // Links to the Patient
    pub label: Option<String>, // Human label of the observed concept, e.g. "Body temperature"
    pub value: Option<String>, // Raw value text, e.g. "38.5 Celsius"
    pub status: Option<String>,
    pub codes: Vec<NodeId>, // Links to Code nodes
}

impl ToNode for ObservationFact {
    fn to_node(&self) -> Node {
        Node::new(self.id.clone())
            .with_optional_property("code", self.label.as_deref())
            .with_optional_property("value", self.value.as_deref())
            .with_optional_property("status", self.status.as_deref())
    }
}
