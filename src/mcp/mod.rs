//! Model Context Protocol surface over the tool registry.
//!
//! Stateless: every message is answered on its own, nothing is kept between
//! requests.

pub mod prompts;
pub mod protocol;
pub mod resources;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::tools::{ToolRegistry, ToolResult};
use protocol::{negotiate_version, JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};

#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct GetPromptParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

fn params<T: DeserializeOwned>(value: Value) -> Result<T, JsonRpcError> {
    serde_json::from_value(value).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
}

pub struct McpServer {
    registry: Arc<ToolRegistry>,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>, info: ServerInfo) -> Self {
        Self { registry, info }
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Answer one JSON-RPC message. Notifications yield `None`.
    pub async fn handle(&self, message: Value) -> Option<JsonRpcResponse> {
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    id,
                    JsonRpcError::invalid_request(e.to_string()),
                ))
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_request("jsonrpc must be \"2.0\""),
            ));
        }

        if request.is_notification() {
            debug!("Notification '{}'", request.method);
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        debug!("Request '{}' id={}", request.method, id);
        Some(match self.dispatch(request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    /// Answer a batch; responses keep request order, notifications drop out.
    pub async fn handle_batch(&self, messages: Vec<Value>) -> Vec<JsonRpcResponse> {
        let mut responses = Vec::with_capacity(messages.len());
        for message in messages {
            if let Some(response) = self.handle(message).await {
                responses.push(response);
            }
        }
        responses
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> Result<Value, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => Ok(self.initialize(&request.params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.registry.definitions() })),
            "tools/call" => self.call_tool(params(request.params)?).await,
            "resources/list" => Ok(resources::list()),
            "resources/read" => {
                let p: ReadResourceParams = params(request.params)?;
                resources::read(&p.uri, &self.info)
            }
            "prompts/list" => Ok(prompts::list()),
            "prompts/get" => {
                let p: GetPromptParams = params(request.params)?;
                prompts::get(&p.name, &p.arguments)
            }
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }

    fn initialize(&self, params: &Value) -> Value {
        let requested = params.get("protocolVersion").and_then(Value::as_str);
        json!({
            "protocolVersion": negotiate_version(requested),
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "listChanged": false },
                "prompts": { "listChanged": false }
            },
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version
            }
        })
    }

    /// Caller faults become JSON-RPC errors; execution failures are
    /// reported in-band with `isError`.
    async fn call_tool(&self, p: CallToolParams) -> Result<Value, JsonRpcError> {
        let result = match self.registry.invoke(&p.name, &p.arguments).await {
            Ok(result) => result,
            Err(e) if e.is_caller_fault() => {
                warn!("Rejected call to '{}': {}", p.name, e);
                return Err(JsonRpcError::invalid_params(e.to_string()));
            }
            Err(e) => ToolResult::error(e.to_string()),
        };
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal(e.to_string()))
    }
}
