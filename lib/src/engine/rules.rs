// lib/src/engine/rules.rs

use std::collections::HashSet;
use std::fmt;

use log::{debug, warn};
use models::{Edge, Node, NodeId, NodeType, Relation};
use serde::{Deserialize, Serialize};

use crate::engine::Graph;
use crate::errors::{GraphError, GraphResult};

pub const LOINC_SYSTEM: &str = "http://loinc.org";

/// Threshold comparison applied as `value <op> threshold`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[serde(rename = ">=", alias = "ge")]
    Ge,
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = "<=", alias = "le")]
    Le,
}

impl Comparator {
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Gt => value > threshold,
            Comparator::Ge => value >= threshold,
            Comparator::Lt => value < threshold,
            Comparator::Le => value <= threshold,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
        })
    }
}

/// A declarative threshold rule: observations coded `system`/`code` whose
/// numeric value satisfies `comparator threshold` yield `finding`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default = "default_rule_system")]
    pub system: String,
    pub code: String,
    pub comparator: Comparator,
    pub threshold: f64,
    pub finding: String,
}

fn default_rule_system() -> String {
    LOINC_SYSTEM.to_string()
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        system: impl Into<String>,
        code: impl Into<String>,
        comparator: Comparator,
        threshold: f64,
        finding: impl Into<String>,
    ) -> Self {
        Rule {
            name: name.into(),
            system: system.into(),
            code: code.into(),
            comparator,
            threshold,
            finding: finding.into(),
        }
    }

    pub fn fever() -> Self {
        Rule::new("Fever", LOINC_SYSTEM, "8310-5", Comparator::Gt, 38.0, "Fever")
    }

    pub fn tachycardia() -> Self {
        Rule::new("Tachycardia", LOINC_SYSTEM, "8867-4", Comparator::Gt, 100.0, "Tachycardia")
    }

    /// `Finding/<label>`
    pub fn finding_id(&self) -> GraphResult<NodeId> {
        Ok(NodeId::new(NodeType::Finding, &self.finding)?)
    }

    fn matches_code(&self, node: &Node) -> bool {
        node.node_type == NodeType::Code
            && node.get_str("system") == Some(self.system.as_str())
            && node.get_str("code") == Some(self.code.as_str())
    }

    /// Every firing of this rule against `graph`, in edge order. Reads the
    /// graph only.
    pub fn derive(&self, graph: &Graph) -> Vec<Derivation> {
        let finding = match self.finding_id() {
            Ok(id) => id,
            Err(e) => {
                warn!("Rule {} has an unusable finding label: {}", self.name, e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let mut derivations = Vec::new();

        for edge in graph.edges().iter().filter(|e| e.rel == Relation::HasCode) {
            if !graph.node(&edge.dst).is_some_and(|code| self.matches_code(code)) {
                continue;
            }
            let Some(observation) = graph.node(&edge.src) else {
                continue;
            };
            if observation.node_type != NodeType::Observation || !seen.insert(observation.id.clone()) {
                continue;
            }

            let Some(value) = observation.get_str("value").and_then(parse_leading_number) else {
                debug!("{}: no numeric value on {}", self.name, observation.id);
                continue;
            };
            if !self.comparator.holds(value, self.threshold) {
                continue;
            }

            match subject_of(graph, &observation.id) {
                Some(patient) => {
                    debug!(
                        "{}: {} {} {} on {}",
                        self.name, value, self.comparator, self.threshold, observation.id
                    );
                    derivations.push(Derivation {
                        rule: self.name.clone(),
                        observation: observation.id.clone(),
                        patient,
                        finding: finding.clone(),
                        label: self.finding.clone(),
                        value,
                    })
                }
                None => debug!(
                    "{}: {} fired but has no resolvable patient subject",
                    self.name, observation.id
                ),
            }
        }
        derivations
    }
}

/// First `HAS_SUBJECT` target of the observation that exists as a Patient.
fn subject_of(graph: &Graph, observation: &NodeId) -> Option<NodeId> {
    graph
        .edges_from(observation, Relation::HasSubject)
        .find(|e| graph.node(&e.dst).is_some_and(|n| n.node_type == NodeType::Patient))
        .map(|e| e.dst.clone())
}

/// The leading whitespace-separated token of `text` as a finite number,
/// e.g. `"38.5 Celsius"` -> `38.5`.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    text.split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// One rule firing for one observation.
#[derive(Clone, Debug, PartialEq)]
pub struct Derivation {
    pub rule: String,
    pub observation: NodeId,
    pub patient: NodeId,
    pub finding: NodeId,
    pub label: String,
    pub value: f64,
}

/// An ordered rule list.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Validates every rule: a non-empty finding label and a finite threshold.
    pub fn new(rules: Vec<Rule>) -> GraphResult<Self> {
        for rule in &rules {
            rule.finding_id().map_err(|e| {
                GraphError::ConfigurationError(format!("rule '{}': {}", rule.name, e))
            })?;
            if !rule.threshold.is_finite() {
                return Err(GraphError::ConfigurationError(format!(
                    "rule '{}': threshold must be finite",
                    rule.name
                )));
            }
            if rule.system.is_empty() || rule.code.is_empty() {
                return Err(GraphError::ConfigurationError(format!(
                    "rule '{}': system and code are required",
                    rule.name
                )));
            }
        }
        Ok(RuleSet { rules })
    }

    /// Fever (LOINC 8310-5 > 38.0) and Tachycardia (LOINC 8867-4 > 100).
    pub fn builtin() -> Self {
        RuleSet {
            rules: builtin_rules(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::builtin()
    }
}

pub fn builtin_rules() -> Vec<Rule> {
    vec![Rule::fever(), Rule::tachycardia()]
}

/// Outcome of one evaluation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationReport {
    pub derivations: Vec<Derivation>,
    pub edges_added: usize,
}

/// Evaluates a rule set against per-patient graphs.
#[derive(Clone, Debug, Default)]
pub struct RuleEngine {
    rules: RuleSet,
}

impl RuleEngine {
    pub fn new(rules: RuleSet) -> Self {
        RuleEngine { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// All rules see the same structural graph; their derivations are
    /// applied only after every rule has run.
    pub fn derive(&self, graph: &Graph) -> Vec<Derivation> {
        self.rules.rules().iter().flat_map(|rule| rule.derive(graph)).collect()
    }

    /// Derives, then adds one `Finding/<label>` node per label and one
    /// `HAS_FINDING` edge per (patient, finding). Edges already present,
    /// from this pass or an earlier one, are not added again.
    pub fn evaluate(&self, graph: &mut Graph) -> EvaluationReport {
        let derivations = self.derive(graph);
        let mut edges_added = 0;

        for d in &derivations {
            debug!(
                "{} fired on {} (value {}) for {}",
                d.rule, d.observation, d.value, d.patient
            );
            graph.add_node(Node::new(d.finding.clone()).with_property("label", d.label.as_str()));
            if !graph.contains_edge(&d.patient, &d.finding, Relation::HasFinding) {
                graph.add_edge(Edge::new(d.patient.clone(), Relation::HasFinding, d.finding.clone()));
                edges_added += 1;
            }
        }

        EvaluationReport {
            derivations,
            edges_added,
        }
    }
}
