// models/src/medical/code.rs
use crate::{Node, NodeId, ToNode};

/// A coded concept, e.g. LOINC `8310-5`.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeFact {
    pub system: String, // Coding system URI, e.g. "http://loinc.org"
    pub code: String,
    pub display: Option<String>,
}

impl CodeFact {
    pub fn node_id(&self) -> NodeId {
        NodeId::code(&self.system, &self.code)
    }
}

impl ToNode for CodeFact {
    fn to_node(&self) -> Node {
        Node::new(self.node_id())
            .with_property("system", self.system.as_str())
            .with_property("code", self.code.as_str())
            .with_optional_property("display", self.display.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeType;

    #[test]
    fn code_node_is_keyed_by_system_and_code() {
        let fact = CodeFact {
            system: "http://loinc.org".to_string(),
            code: "8867-4".to_string(),
            display: None,
        };
        let node = fact.to_node();
        assert_eq!(node.id.as_str(), "Code/http://loinc.org|8867-4");
        assert_eq!(node.node_type, NodeType::Code);
        assert_eq!(node.get_str("system"), Some("http://loinc.org"));
        assert_eq!(node.get_str("code"), Some("8867-4"));
        assert!(node.get_property("display").is_none());
    }
}
