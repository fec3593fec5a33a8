//! HTTP client for the external rule service: flow persistence, rule evaluation and
//! rule generation. None of these retry; a failure is returned to the caller as is.

use crate::config::ClientConfig;
use crate::data::{FactContext, FlowSnapshot};
use crate::error::ClientError;
use crate::rule::Rule;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

mod messages;

pub use messages::*;

#[derive(Debug, Clone)]
pub struct RuleServiceClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl RuleServiceClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Builder(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Persists a flow snapshot.
    pub async fn save(&self, snapshot: &FlowSnapshot) -> Result<SaveReceipt, ClientError> {
        let url = self.url(FLOWS_PATH);
        tracing::info!(%url, flow_id = %snapshot.id, nodes = snapshot.nodes.len(), "saving flow");
        let body = self.send(self.http.post(&url).json(snapshot), &url).await?;
        // The receipt is informational; an unexpected body is not a failed save.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    /// Evaluates `rules` against `context`. The response is returned verbatim.
    pub async fn evaluate(
        &self,
        context: &FactContext,
        rules: &[Rule],
    ) -> Result<Value, ClientError> {
        let url = self.url(EVALUATE_PATH);
        tracing::info!(%url, rules = rules.len(), "evaluating rules");
        let request = EvaluateRequest { context, rules };
        let body = self.send(self.http.post(&url).json(&request), &url).await?;
        decode(&url, &body)
    }

    /// Asks the service to turn a free-text description into a rule document. The
    /// document is returned unvalidated; see [`crate::layout::parse_rule`].
    pub async fn generate(&self, prompt: &str) -> Result<Value, ClientError> {
        let url = self.url(GENERATE_PATH);
        tracing::info!(%url, prompt_len = prompt.len(), "generating rule");
        let request = GenerateRequest { prompt };
        let body = self.send(self.http.post(&url).json(&request), &url).await?;
        decode(&url, &body)
    }

    /// Fetches a saved flow. The service answers `{}` for an unknown id.
    pub async fn load(&self, flow_id: &str) -> Result<Option<FlowSnapshot>, ClientError> {
        let url = self.flow_url(flow_id)?;
        tracing::info!(%url, "loading flow");
        let body = self.send(self.http.get(url.clone()), url.as_str()).await?;
        let value: Value = decode(url.as_str(), &body)?;
        if value.as_object().is_some_and(|o| o.is_empty()) || value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ClientError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    /// `{base}/flows/{flow_id}`, with `flow_id` percent-encoded as one path segment.
    fn flow_url(&self, flow_id: &str) -> Result<Url, ClientError> {
        let base = self.url(FLOWS_PATH);
        let invalid = |message: String| ClientError::InvalidUrl {
            url: base.clone(),
            message,
        };
        let mut url = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot hold a path".to_string()))?
            .push(flow_id);
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<String, ClientError> {
        let response = request.send().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "rule service rejected request");
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

