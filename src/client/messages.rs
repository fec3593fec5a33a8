use crate::data::FactContext;
use crate::rule::Rule;
use serde::{Deserialize, Serialize};

pub const FLOWS_PATH: &str = "/flows";
pub const EVALUATE_PATH: &str = "/rules/evaluate";
pub const GENERATE_PATH: &str = "/rules/generate";

#[derive(Debug, Serialize)]
pub struct EvaluateRequest<'a> {
    pub context: &'a FactContext,
    pub rules: &'a [Rule],
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
}

/// Acknowledgement of a save. The service's body is informational only; fields it
/// does not send stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SaveReceipt {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}
