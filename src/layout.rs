//! Rule → graph synthesis.
//!
//! A rule is drawn as a single column: the entry node at [`ANCHOR`], then every
//! condition, then every action, each [`ROW_STEP`] below the previous one, joined by
//! one linear chain of edges.

use crate::error::LayoutError;
use crate::graph::{
    ActionFields, ConditionFields, Edge, EdgeStyle, IdAllocator, Node, NodeData, Position,
    StartFields,
};
use crate::rule::{Action, Condition, Rule};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ANCHOR: Position = Position::new(250.0, 5.0);
pub const COLUMN_X: f64 = 250.0;
pub const FIRST_ROW_Y: f64 = 150.0;
pub const ROW_STEP: f64 = 150.0;

/// A complete set of nodes and edges that replaces a graph wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphLayout {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphLayout {
    /// Lays out an untrusted rule document, such as a generation response.
    ///
    /// The document is validated before any identifier is allocated, so a malformed
    /// document leaves `ids` untouched and produces no nodes.
    pub fn from_json(value: &Value, ids: &mut IdAllocator) -> Result<Self, LayoutError> {
        let rule = parse_rule(value)?;
        Ok(layout(&rule, ids))
    }
}

/// Checks that `value` carries `conditions` and `actions` lists and decodes it.
pub fn parse_rule(value: &Value) -> Result<Rule, LayoutError> {
    let Some(document) = value.as_object() else {
        return Err(LayoutError::MalformedRule(format!(
            "expected a rule object, found {}",
            describe(value)
        )));
    };

    for key in ["conditions", "actions"] {
        match document.get(key) {
            Some(Value::Array(_)) => {}
            Some(other) => {
                return Err(LayoutError::MalformedRule(format!(
                    "'{}' must be a list, found {}",
                    key,
                    describe(other)
                )));
            }
            None => {
                return Err(LayoutError::MalformedRule(format!("'{}' is missing", key)));
            }
        }
    }

    serde_json::from_value(value.clone()).map_err(|e| LayoutError::MalformedRule(e.to_string()))
}

/// Synthesizes the graph for `rule`, drawing fresh identifiers from `ids`.
pub fn layout(rule: &Rule, ids: &mut IdAllocator) -> GraphLayout {
    let mut nodes = Vec::with_capacity(1 + rule.conditions.len() + rule.actions.len());
    nodes.push(Node {
        id: ids.next(),
        data: NodeData::Start(StartFields::new()),
        position: ANCHOR,
    });

    let conditions = rule
        .conditions
        .iter()
        .map(|c: &Condition| NodeData::Condition(ConditionFields::from(c)));
    let actions = rule
        .actions
        .iter()
        .map(|a: &Action| NodeData::Action(ActionFields::from(a)));

    // The running offset carries on from the conditions into the actions.
    for (row, data) in conditions.chain(actions).enumerate() {
        nodes.push(Node {
            id: ids.next(),
            data,
            position: Position::new(COLUMN_X, FIRST_ROW_Y + row as f64 * ROW_STEP),
        });
    }

    let edges = nodes
        .iter()
        .enumerate()
        .tuple_windows()
        .map(|((i, from), (j, to))| Edge {
            id: format!("e{}-{}", i, j),
            source: from.id.clone(),
            target: to.id.clone(),
            style: EdgeStyle::SmoothStep,
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        rule_id = %rule.id,
        nodes = nodes.len(),
        edges = edges.len(),
        "laid out rule"
    );

    GraphLayout { nodes, edges }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
