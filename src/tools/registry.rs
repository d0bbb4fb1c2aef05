use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use super::content::ToolResult;
use super::schema::{ToolSchema, ValidatedArgs};
use crate::error::ToolError;

/// A named operation exposed through the gateway.
///
/// `call` only ever sees arguments that already passed `schema()`.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn schema(&self) -> ToolSchema;

    async fn call(&self, args: ValidatedArgs) -> Result<ToolResult, ToolError>;
}

/// Tool listing entry as published to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

struct RegisteredTool {
    schema: ToolSchema,
    handler: Arc<dyn ToolHandler>,
}

/// Name-keyed table of tools, each paired with its schema.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, RegisteredTool>,
    order: Vec<&'static str>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A later registration under the same name replaces
    /// the earlier one.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let name = handler.name();
        let schema = handler.schema();
        if self
            .tools
            .insert(name, RegisteredTool { schema, handler })
            .is_none()
        {
            self.order.push(name);
        }
        debug!("Registered tool '{}'", name);
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolDefinition {
                name: tool.handler.name().to_string(),
                description: tool.handler.description().to_string(),
                input_schema: tool.schema.to_json_schema(),
            })
            .collect()
    }

    /// Validate `raw_arguments` against the tool's schema and run it.
    ///
    /// Validation happens before the handler is touched, so a rejected call
    /// has no side effect.
    pub async fn invoke(&self, tool_name: &str, raw_arguments: &Value) -> Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        let args = tool.schema.validate(raw_arguments)?;

        let call_id = Uuid::new_v4();
        let span = tracing::info_span!("tool_call", tool = tool_name, %call_id);
        async move {
            info!("Invoking tool");
            let outcome = tool.handler.call(args).await;
            match &outcome {
                Ok(_) => debug!("Tool finished"),
                Err(e) => warn!(kind = e.kind(), "Tool failed: {}", e),
            }
            outcome
        }
        .instrument(span)
        .await
    }
}
