use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::guidance::{self, Guidance};

/// Classified failure of a report request.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("{env_var} is not set")]
    Configuration { env_var: String },

    #[error("report text is missing or not a string")]
    Validation,

    #[error("workflow service answered {status}")]
    Upstream {
        status: u16,
        guidance: Guidance,
        raw: Value,
    },

    #[error("workflow run failed: {}", .message.as_deref().unwrap_or("no reason given"))]
    WorkflowFailed { message: Option<String> },

    #[error("network error: {0}")]
    Network(String),
}

/// Wire shape of every failure answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureBody {
    pub error: bool,
    pub detail: String,
    pub solution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl ReportError {
    /// HTTP status mirrored to the caller.
    pub fn status(&self) -> u16 {
        match self {
            ReportError::Validation => 400,
            ReportError::Upstream { status, .. } => *status,
            ReportError::Configuration { .. }
            | ReportError::WorkflowFailed { .. }
            | ReportError::Network(_) => 500,
        }
    }

    pub fn to_body(&self) -> FailureBody {
        let (detail, solution, raw) = match self {
            ReportError::Configuration { env_var } => (
                format!("{} 환경변수가 설정되지 않았습니다.", env_var),
                format!("프로젝트 설정에서 {} 환경변수를 추가해주세요.", env_var),
                None,
            ),
            ReportError::Validation => owned(guidance::MISSING_TEXT, None),
            ReportError::Upstream { guidance, raw, .. } => owned(*guidance, Some(raw.clone())),
            ReportError::WorkflowFailed { message } => (
                message
                    .clone()
                    .unwrap_or_else(|| guidance::WORKFLOW_FAILED.detail.to_string()),
                guidance::WORKFLOW_FAILED.solution.to_string(),
                None,
            ),
            ReportError::Network(_) => owned(guidance::NETWORK, None),
        };
        FailureBody {
            error: true,
            detail,
            solution,
            raw,
        }
    }
}

fn owned(g: Guidance, raw: Option<Value>) -> (String, String, Option<Value>) {
    (g.detail.to_string(), g.solution.to_string(), raw)
}
