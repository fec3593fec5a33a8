use super::ids::NodeId;
use crate::rule::{ActionType, ConditionOperator, Params};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The three kinds of box a user can place on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[serde(rename = "input")]
    Start,
    Condition,
    Action,
}

impl NodeKind {
    /// Fields of a freshly dropped node of this kind.
    pub fn default_data(self) -> NodeData {
        let label = format!("{} node", self);
        match self {
            NodeKind::Start => NodeData::Start(StartFields { label }),
            NodeKind::Condition => NodeData::Condition(ConditionFields {
                label,
                ..ConditionFields::default()
            }),
            NodeKind::Action => NodeData::Action(ActionFields {
                label,
                ..ActionFields::default()
            }),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Start => write!(f, "start"),
            NodeKind::Condition => write!(f, "condition"),
            NodeKind::Action => write!(f, "action"),
        }
    }
}

/// Fields of the conventional entry node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartFields {
    #[serde(default)]
    pub label: String,
}

impl StartFields {
    pub fn new() -> Self {
        Self {
            label: "Start Flow".to_string(),
        }
    }
}

/// Fields of a condition box. Every field may be unset while the user is editing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionFields {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<ConditionOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Fields of an action box.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionFields {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::rule::definition::serialize_optional_params"
    )]
    pub params: Option<Params>,
}

/// Kind-specific node payload. Serialized as `{"type": ..., "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeData {
    #[serde(rename = "input")]
    Start(StartFields),
    Condition(ConditionFields),
    Action(ActionFields),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Start(_) => NodeKind::Start,
            NodeData::Condition(_) => NodeKind::Condition,
            NodeData::Action(_) => NodeKind::Action,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodeData::Start(fields) => &fields.label,
            NodeData::Condition(fields) => &fields.label,
            NodeData::Action(fields) => &fields.label,
        }
    }

    /// Returns a copy of these fields with one field overwritten, or `None` when this
    /// kind of node does not carry the edited field.
    pub fn with_edit(&self, edit: FieldEdit) -> Option<NodeData> {
        let mut next = self.clone();
        match (&mut next, edit) {
            (NodeData::Start(fields), FieldEdit::Label(label)) => fields.label = label,
            (NodeData::Condition(fields), FieldEdit::Label(label)) => fields.label = label,
            (NodeData::Action(fields), FieldEdit::Label(label)) => fields.label = label,
            (NodeData::Condition(fields), FieldEdit::Field(field)) => fields.field = field,
            (NodeData::Condition(fields), FieldEdit::Operator(op)) => fields.operator = Some(op),
            (NodeData::Condition(fields), FieldEdit::Value(value)) => fields.value = value,
            (NodeData::Action(fields), FieldEdit::ActionType(kind)) => {
                fields.action_type = Some(kind)
            }
            (NodeData::Action(fields), FieldEdit::Params(params)) => fields.params = Some(params),
            _ => return None,
        }
        Some(next)
    }
}

/// A box on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(flatten)]
    pub data: NodeData,
    pub position: Position,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}

/// How the canvas draws an edge. Has no effect on the compiled rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Default,
    Straight,
    Step,
    SmoothStep,
}

/// A connection drawn between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type", default)]
    pub style: EdgeStyle,
}

/// A single field-level edit, addressed by field name on the wire:
/// `{"field": "operator", "value": "contains"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldEdit {
    Label(String),
    Field(Option<String>),
    Operator(ConditionOperator),
    Value(Option<String>),
    ActionType(ActionType),
    Params(Params),
}

impl FieldEdit {
    pub fn name(&self) -> &'static str {
        match self {
            FieldEdit::Label(_) => "label",
            FieldEdit::Field(_) => "field",
            FieldEdit::Operator(_) => "operator",
            FieldEdit::Value(_) => "value",
            FieldEdit::ActionType(_) => "actionType",
            FieldEdit::Params(_) => "params",
        }
    }
}
