use crate::graph::{Edge, Node};
use crate::rule::Rule;
use serde::{Deserialize, Serialize};

/// Identifier under which the editor persists its flow.
pub const LATEST_FLOW_ID: &str = "latest_flow";

/// A saved flow: the full graph together with the rule compiled from it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlowSnapshot {
    pub id: String,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    pub generated_rule: Rule,
}
