// models/src/medical/patient.rs
use crate::{Node, NodeId, ToNode};

#[derive(Debug, Clone, PartialEq)]
pub struct PatientFact {
    pub id: NodeId,
    pub name: Option<String>, // given names followed by family name
    pub gender: Option<String>,
    pub birth_date: Option<String>,
}

impl ToNode for PatientFact {
    fn to_node(&self) -> Node {
        Node::new(self.id.clone())
            .with_optional_property("name", self.name.as_deref())
            .with_optional_property("gender", self.gender.as_deref())
            .with_optional_property("birthDate", self.birth_date.as_deref())
    }
}
