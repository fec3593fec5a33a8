use crate::graph::{ActionFields, ConditionFields};
use crate::rule::{Action, Condition};

// Unset fields fall back to the rule defaults; `field` and `value` pass through unset.

impl From<&ConditionFields> for Condition {
    fn from(fields: &ConditionFields) -> Self {
        Condition {
            field: fields.field.clone(),
            operator: fields.operator.unwrap_or_default(),
            value: fields.value.clone(),
        }
    }
}

impl From<&ActionFields> for Action {
    fn from(fields: &ActionFields) -> Self {
        Action {
            action_type: fields.action_type.unwrap_or_default(),
            params: fields.params.clone().unwrap_or_default(),
        }
    }
}

impl From<&Condition> for ConditionFields {
    fn from(condition: &Condition) -> Self {
        ConditionFields {
            label: "Condition".to_string(),
            field: condition.field.clone(),
            operator: Some(condition.operator),
            value: condition.value.clone(),
        }
    }
}

impl From<&Action> for ActionFields {
    fn from(action: &Action) -> Self {
        ActionFields {
            label: "Action".to_string(),
            action_type: Some(action.action_type),
            params: Some(action.params.clone()),
        }
    }
}
