use super::definition::Rule;
use crate::error::FlowConversionError;

/// A trait for custom rule formats that can be converted into a flowrule `Rule`.
///
/// Implement it on your own structs to feed rules from another source (a config file,
/// a database row, a different service's payload) into the reverse layout.
///
/// # Example
///
/// ```rust,no_run
/// use flowrule::error::FlowConversionError;
/// use flowrule::rule::{Action, Condition, ConditionOperator, IntoRule, Params, Rule};
///
/// struct PaidReferral { amount: u64 }
///
/// impl IntoRule for PaidReferral {
///     fn into_rule(self) -> Result<Rule, FlowConversionError> {
///         let mut params = Params::new();
///         params.insert("amount".to_string(), self.amount.into());
///         Ok(Rule {
///             conditions: vec![Condition {
///                 field: Some("referrer.status".to_string()),
///                 operator: ConditionOperator::Equals,
///                 value: Some("paid".to_string()),
///             }],
///             actions: vec![Action { params, ..Action::default() }],
///             ..Rule::default()
///         })
///     }
/// }
/// ```
pub trait IntoRule {
    /// Consumes the object and converts it into a rule document.
    fn into_rule(self) -> Result<Rule, FlowConversionError>;
}

impl IntoRule for Rule {
    fn into_rule(self) -> Result<Rule, FlowConversionError> {
        Ok(self)
    }
}

impl IntoRule for serde_json::Value {
    fn into_rule(self) -> Result<Rule, FlowConversionError> {
        serde_json::from_value(self).map_err(|e| FlowConversionError::ValidationError(e.to_string()))
    }
}
