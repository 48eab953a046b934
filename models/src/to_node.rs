// models/src/to_node.rs

use crate::nodes::Node;

/// Conversion of a normalized fact into its graph node.
pub trait ToNode {
    fn to_node(&self) -> Node;
}
