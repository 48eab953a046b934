// models/src/nodes.rs
use serde::{Deserialize, Serialize};

use crate::{
    identifiers::{NodeId, NodeType},
    properties::{get_string, Properties, PropertyValue},
};

/// A node of the semantic graph (a patient, an observation, a coded concept
/// or a derived finding).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// The id of the node, unique within a graph.
    pub id: NodeId,

    /// The node type. Taken from the id's prefix on construction.
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// The properties of the node.
    #[serde(default)]
    pub props: Properties,
}

impl Node {
    /// Creates a node without properties. The type follows the id.
    pub fn new(id: NodeId) -> Self {
        Node {
            node_type: id.node_type(),
            id,
            props: Properties::new(),
        }
    }

    /// Add or update a property using a builder pattern.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Adds the property only when a value is present. Absent values are
    /// never stored, so a later merge cannot erase an earlier value.
    pub fn with_optional_property<V: Into<PropertyValue>>(
        self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(v) => self.with_property(key, v),
            None => self,
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.props.get(key)
    }

    /// Returns the property if it exists and is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        get_string(&self.props, key)
    }

    /// Union of properties; `props` wins on key collision.
    pub fn merge_props(&mut self, props: Properties) {
        self.props.extend(props);
    }
}
