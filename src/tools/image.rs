use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use super::content::ToolResult;
use super::registry::ToolHandler;
use super::schema::{FieldSpec, ToolSchema, ValidatedArgs};
use crate::config::UpstreamConfig;
use crate::env::EnvSource;
use crate::error::ToolError;

const FALLBACK_MIME: &str = "image/png";

#[derive(Debug, Deserialize)]
struct ImageArgs {
    prompt: String,
}

/// Text-to-image through a hosted inference endpoint.
pub struct ImageTool {
    client: Client,
    base_url: String,
    model: String,
    inference_steps: u32,
    token_env: String,
    env: Arc<dyn EnvSource>,
}

impl ImageTool {
    pub fn new(client: Client, upstream: &UpstreamConfig, env: Arc<dyn EnvSource>) -> Self {
        Self {
            client,
            base_url: upstream.image_base_url.trim_end_matches('/').to_string(),
            model: upstream.image_model.clone(),
            inference_steps: upstream.image_inference_steps,
            token_env: upstream.image_token_env.clone(),
            env,
        }
    }

    fn wrap(detail: impl std::fmt::Display) -> String {
        format!("이미지 생성 중 오류가 발생했습니다: {}", detail)
    }
}

#[async_trait]
impl ToolHandler for ImageTool {
    fn name(&self) -> &'static str {
        "generate_image"
    }

    fn description(&self) -> &'static str {
        "Hugging Face FLUX.1-schnell 모델로 이미지를 생성합니다"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new().field(FieldSpec::string("prompt", "이미지 생성을 위한 프롬프트"))
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolResult, ToolError> {
        let args: ImageArgs = args.parse()?;

        let token = self.env.var(&self.token_env).ok_or_else(|| {
            ToolError::configuration(format!("{} 환경변수가 설정되지 않았습니다", self.token_env))
        })?;

        let url = format!("{}/models/{}", self.base_url, self.model);
        debug!("Requesting image from {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, FALLBACK_MIME)
            .json(&json!({
                "inputs": args.prompt,
                "parameters": { "num_inference_steps": self.inference_steps }
            }))
            .send()
            .await
            .map_err(|e| {
                error!("Image request failed: {}", e);
                ToolError::network(Self::wrap(e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::upstream(
                status.as_u16(),
                Self::wrap(format!("{} {}", status.as_u16(), body.trim())),
            ));
        }

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ToolError::network(Self::wrap(e)))?;

        debug!("Received {} bytes of {}", bytes.len(), mime_type);
        Ok(ToolResult::image(STANDARD.encode(&bytes), mime_type))
    }
}
