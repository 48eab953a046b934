// models/src/identifiers.rs

use core::ops::Deref;
use std::{cmp::Ordering, fmt, str::FromStr};

use internment::Intern;
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

/// The kind of entity a node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    Patient,
    Observation,
    Code,
    Finding,
}

impl NodeType {
    pub const ALL: [NodeType; 4] = [
        NodeType::Patient,
        NodeType::Observation,
        NodeType::Code,
        NodeType::Finding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Patient => "Patient",
            NodeType::Observation => "Observation",
            NodeType::Code => "Code",
            NodeType::Finding => "Finding",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownNodeType(s.to_string()))
    }
}

/// A node identifier of the form `<Type>/<local-id>`, e.g. `Patient/p1` or
/// `Code/http://loinc.org|8310-5`.
///
/// The full string is interned, so clones and equality checks are cheap even
/// though every edge carries two of them. Only the first `/` separates the
/// type from the local part; the local part may itself contain slashes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId {
    node_type: NodeType,
    value: Intern<String>,
}

impl NodeId {
    /// Creates an identifier from a node type and a local id.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyLocalId` if `local` is empty.
    pub fn new(node_type: NodeType, local: &str) -> ValidationResult<Self> {
        if local.is_empty() {
            return Err(ValidationError::EmptyLocalId(node_type));
        }
        Ok(Self {
            node_type,
            value: Intern::new(format!("{}/{}", node_type, local)),
        })
    }

    /// `Code/<system>|<code>`. The pipe keeps the local part non-empty, so
    /// this cannot fail.
    pub fn code(system: &str, code: &str) -> Self {
        Self {
            node_type: NodeType::Code,
            value: Intern::new(format!("{}/{}|{}", NodeType::Code, system, code)),
        }
    }

    /// Parses a full `<Type>/<local-id>` reference.
    pub fn parse(value: &str) -> ValidationResult<Self> {
        let (prefix, local) = value
            .split_once('/')
            .ok_or_else(|| ValidationError::InvalidIdentifier(value.to_string()))?;
        let node_type = prefix.parse::<NodeType>()?;
        Self::new(node_type, local)
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// The part after `<Type>/`.
    pub fn local(&self) -> &str {
        &self.as_str()[self.node_type.as_str().len() + 1..]
    }

    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for NodeId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl FromStr for NodeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NodeId {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        Self::parse(&value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.as_str().to_string()
    }
}

// Interned values hash by pointer, so ordering goes through the string itself.
impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}
