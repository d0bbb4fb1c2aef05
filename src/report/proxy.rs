use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::error::ReportError;
use super::guidance;
use crate::config::UpstreamConfig;
use crate::env::EnvSource;

/// Key under which the narrative is passed to the workflow.
pub const INPUT_KEY: &str = "text1";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSuccess {
    pub success: bool,
    pub file: Option<String>,
    #[serde(rename = "workflowRunId")]
    pub workflow_run_id: Option<String>,
    #[serde(rename = "elapsedTime")]
    pub elapsed_time: Option<f64>,
}

/// Forwards report text to the workflow service and classifies the answer.
pub struct ReportProxy {
    client: Client,
    endpoint: String,
    user: String,
    key_env: String,
    env: Arc<dyn EnvSource>,
}

impl ReportProxy {
    pub fn new(client: Client, upstream: &UpstreamConfig, env: Arc<dyn EnvSource>) -> Self {
        Self {
            client,
            endpoint: format!(
                "{}/workflows/run",
                upstream.workflow_base_url.trim_end_matches('/')
            ),
            user: upstream.report_user.clone(),
            key_env: upstream.report_api_key_env.clone(),
            env,
        }
    }

    /// Run the report workflow for `request` (`{"text1": "..."}`).
    ///
    /// The credential is checked first, then the payload; neither failure
    /// touches the network. Exactly one upstream call is made otherwise.
    pub async fn generate_report(&self, request: &Value) -> Result<ReportSuccess, ReportError> {
        let api_key = self
            .env
            .var(&self.key_env)
            .ok_or_else(|| ReportError::Configuration {
                env_var: self.key_env.clone(),
            })?;

        let text = request
            .get(INPUT_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or(ReportError::Validation)?;

        info!("Requesting report generation ({} chars)", text.chars().count());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&json!({
                "inputs": { INPUT_KEY: text },
                "response_mode": "blocking",
                "mode": "blocking",
                "user": self.user,
            }))
            .send()
            .await
            .map_err(|e| {
                error!("Workflow request failed: {}", e);
                ReportError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.json::<Value>().await.unwrap_or(Value::Null);
            let code = raw.get("code").and_then(Value::as_str);
            let message = raw.get("message").and_then(Value::as_str);
            warn!(
                status = status.as_u16(),
                code = code.unwrap_or("-"),
                "Workflow service rejected the request"
            );
            return Err(ReportError::Upstream {
                status: status.as_u16(),
                guidance: guidance::classify(status.as_u16(), code, message),
                raw,
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            error!("Workflow response was not JSON: {}", e);
            ReportError::Network(e.to_string())
        })?;

        let success = interpret(&body)?;
        debug!(
            "Workflow run {:?} finished in {:?}s",
            success.workflow_run_id, success.elapsed_time
        );
        Ok(success)
    }
}

/// Read a 2xx body. Runs that report failure in-band are errors; missing
/// fields become `None`.
pub fn interpret(body: &Value) -> Result<ReportSuccess, ReportError> {
    let run = body
        .get("data")
        .filter(|d| d.is_object())
        .unwrap_or(body);

    let failed = run.get("status").and_then(Value::as_str) == Some("failed");
    let error_text = match run.get("error") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Bool(false)) => None,
        Some(other) => Some(other.to_string()),
    };
    if failed || error_text.is_some() {
        warn!("Workflow run reported failure: {:?}", error_text);
        return Err(ReportError::WorkflowFailed { message: error_text });
    }

    let workflow_run_id = run
        .get("id")
        .or_else(|| body.get("workflow_run_id"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ReportSuccess {
        success: true,
        file: run
            .pointer("/outputs/file")
            .and_then(Value::as_str)
            .map(str::to_string),
        workflow_run_id,
        elapsed_time: run.get("elapsed_time").and_then(Value::as_f64),
    })
}
