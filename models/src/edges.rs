// models/src/edges.rs
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::NodeId;

/// Relationship labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    /// Observation -> Patient
    HasSubject,
    /// Observation -> Code
    HasCode,
    /// Patient -> Finding
    HasFinding,
    /// Finding -> Finding, population graphs only
    CoOccursWith,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::HasSubject => "HAS_SUBJECT",
            Relation::HasCode => "HAS_CODE",
            Relation::HasFinding => "HAS_FINDING",
            Relation::CoOccursWith => "CO_OCCURS_WITH",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        [
            Relation::HasSubject,
            Relation::HasCode,
            Relation::HasFinding,
            Relation::CoOccursWith,
        ]
        .into_iter()
        .find(|r| r.as_str() == s)
        .ok_or_else(|| ValidationError::UnknownRelation(s.to_string()))
    }
}

/// A directed, typed edge connecting two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node.
    pub src: NodeId,

    /// Target node.
    pub dst: NodeId,

    /// Relationship label.
    pub rel: Relation,

    /// Patient count, set on `CO_OCCURS_WITH` edges only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
}

impl Edge {
    /// Create a new unweighted edge.
    ///
    /// # Arguments
    /// * `src` – source node
    /// * `rel` – relationship label
    /// * `dst` – target node
    pub fn new(src: NodeId, rel: Relation, dst: NodeId) -> Self {
        Self {
            src,
            dst,
            rel,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: u64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// True when source, target and relation all match; weight is ignored.
    pub fn connects(&self, src: &NodeId, dst: &NodeId, rel: Relation) -> bool {
        self.rel == rel && &self.src == src && &self.dst == dst
    }
}
