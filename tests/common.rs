//! Common test utilities for building graphs, rules and service payloads.
use flowrule::prelude::*;
use serde_json::json;

/// `{ "amount": <amount> }`
#[allow(dead_code)]
pub fn amount(amount: i64) -> Params {
    let mut params = Params::new();
    params.insert("amount".to_string(), json!(amount));
    params
}

#[allow(dead_code)]
pub fn start_node(id: &str) -> Node {
    Node {
        id: id.to_string(),
        data: NodeData::Start(StartFields::new()),
        position: Position::new(250.0, 5.0),
    }
}

#[allow(dead_code)]
pub fn condition_node(
    id: &str,
    field: Option<&str>,
    operator: Option<ConditionOperator>,
    value: Option<&str>,
) -> Node {
    Node {
        id: id.to_string(),
        data: NodeData::Condition(ConditionFields {
            label: "condition node".to_string(),
            field: field.map(str::to_string),
            operator,
            value: value.map(str::to_string),
        }),
        position: Position::new(0.0, 0.0),
    }
}

#[allow(dead_code)]
pub fn action_node(id: &str, action_type: Option<ActionType>, params: Option<Params>) -> Node {
    Node {
        id: id.to_string(),
        data: NodeData::Action(ActionFields {
            label: "action node".to_string(),
            action_type,
            params,
        }),
        position: Position::new(0.0, 0.0),
    }
}

#[allow(dead_code)]
pub fn condition(field: &str, operator: ConditionOperator, value: &str) -> Condition {
    Condition {
        field: Some(field.to_string()),
        operator,
        value: Some(value.to_string()),
    }
}

/// Logic: `referrer.status eq paid AND referred.action eq subscribes` -> credit 500
#[allow(dead_code)]
pub fn paid_referral_rule() -> Rule {
    Rule {
        id: "ai_generated".to_string(),
        name: "AI Generated Rule".to_string(),
        operator: Combinator::And,
        conditions: vec![
            condition("referrer.status", ConditionOperator::Equals, "paid"),
            condition("referred.action", ConditionOperator::Equals, "subscribes"),
        ],
        actions: vec![Action {
            action_type: ActionType::CreditReward,
            params: amount(500),
        }],
    }
}

/// The paid-referral rule as the generation service sends it.
#[allow(dead_code)]
pub fn paid_referral_json() -> serde_json::Value {
    json!({
        "id": "ai_generated",
        "name": "AI Generated Rule",
        "operator": "AND",
        "conditions": [
            {"field": "referrer.status", "operator": "eq", "value": "paid"},
            {"field": "referred.action", "operator": "eq", "value": "subscribes"}
        ],
        "actions": [
            {"action_type": "credit_reward", "params": {"amount": 500}}
        ]
    })
}

/// The generation service's fallback rule.
#[allow(dead_code)]
pub fn generic_rule_json() -> serde_json::Value {
    json!({
        "id": "ai_generic",
        "name": "Generic Rule",
        "operator": "AND",
        "conditions": [
            {"field": "user.score", "operator": "gt", "value": "100"}
        ],
        "actions": [
            {"action_type": "send_email", "params": {"template": "congrats"}}
        ]
    })
}

#[allow(dead_code)]
pub fn client_for(base_url: &str) -> RuleServiceClient {
    RuleServiceClient::new(ClientConfig::default().with_base_url(base_url))
        .expect("Failed to build client")
}
