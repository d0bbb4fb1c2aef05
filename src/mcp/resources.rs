use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::protocol::{JsonRpcError, RESOURCE_NOT_FOUND};
use super::ServerInfo;

pub const SERVER_INFO_URI: &str = "server://info";
const SERVER_INFO_NAME: &str = "server-info";
const JSON_MIME: &str = "application/json";

/// Static metadata plus the current timestamp.
#[derive(Debug, Serialize)]
pub struct ServerDescriptor {
    pub name: String,
    pub version: String,
    pub description: String,
    pub timestamp: String,
    pub platform: &'static str,
    pub arch: &'static str,
}

pub fn describe(info: &ServerInfo) -> ServerDescriptor {
    ServerDescriptor {
        name: info.name.clone(),
        version: info.version.clone(),
        description: info.description.clone(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        platform: std::env::consts::OS,
        arch: std::env::consts::ARCH,
    }
}

pub fn list() -> Value {
    json!({
        "resources": [{
            "uri": SERVER_INFO_URI,
            "name": SERVER_INFO_NAME,
            "mimeType": JSON_MIME
        }]
    })
}

pub fn read(uri: &str, info: &ServerInfo) -> Result<Value, JsonRpcError> {
    if uri != SERVER_INFO_URI {
        return Err(JsonRpcError::new(
            RESOURCE_NOT_FOUND,
            format!("Resource not found: {}", uri),
        ));
    }
    let text = serde_json::to_string_pretty(&describe(info))
        .map_err(|e| JsonRpcError::internal(e.to_string()))?;
    Ok(json!({
        "contents": [{
            "uri": SERVER_INFO_URI,
            "mimeType": JSON_MIME,
            "text": text
        }]
    }))
}
