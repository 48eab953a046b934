// models/src/lib.rs

pub mod edges;
pub mod errors;
pub mod identifiers;
pub mod medical;
pub mod nodes;
pub mod properties;
pub mod to_node;

pub use edges::{Edge, Relation};
pub use errors::{ValidationError, ValidationResult};
pub use identifiers::{NodeId, NodeType};
pub use medical::{CodeFact, Fact, ObservationFact, PatientFact};
pub use nodes::Node;
pub use properties::{Properties, PropertyValue};
pub use to_node::ToNode;
