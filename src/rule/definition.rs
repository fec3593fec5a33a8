use ahash::AHashMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Named parameters of an action, e.g. `{ "amount": 500 }`.
///
/// Serialized with keys in sorted order, so saved snapshots are stable across runs.
pub type Params = AHashMap<String, serde_json::Value>;

pub(crate) fn serialize_params<S: Serializer>(
    params: &Params,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    params.iter().collect::<BTreeMap<_, _>>().serialize(serializer)
}

pub(crate) fn serialize_optional_params<S: Serializer>(
    params: &Option<Params>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    params
        .as_ref()
        .map(|p| p.iter().collect::<BTreeMap<_, _>>())
        .serialize(serializer)
}

/// Fact paths offered by the condition editor.
pub const REFERRER_STATUS: &str = "referrer.status";
pub const REFERRED_ACTION: &str = "referred.action";
pub const KNOWN_FACT_FIELDS: [&str; 2] = [REFERRER_STATUS, REFERRED_ACTION];

/// Logical operator joining every condition of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    #[default]
    And,
    /// Accepted from external rule documents; the compiler never produces it.
    Or,
}

/// Comparison applied between a fact and a condition's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConditionOperator {
    #[default]
    #[serde(rename = "eq")]
    Equals,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "lt")]
    LessThan,
}

impl ConditionOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "eq",
            ConditionOperator::Contains => "contains",
            ConditionOperator::GreaterThan => "gt",
            ConditionOperator::LessThan => "lt",
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reward action a rule triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    CreditReward,
    SendEmail,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::CreditReward => "credit_reward",
            ActionType::SendEmail => "send_email",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single condition of a rule, detached from any node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default)]
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A single action of a rule, detached from any node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default, serialize_with = "serialize_params")]
    pub params: Params,
}

/// The flat, normalized rule document exchanged with the rule service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub operator: Combinator,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
}

/// Caller-supplied identity of a compiled rule. Never derived from the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleIdentity {
    pub id: String,
    pub name: String,
}

impl RuleIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Identity attached to a rule that is persisted together with its flow.
    pub fn saved() -> Self {
        Self::new("generated_rule", "Visual Flow Rule")
    }

    /// Identity attached to a rule built only for an ad-hoc evaluation.
    pub fn transient() -> Self {
        Self::new("temp", "Test")
    }
}
