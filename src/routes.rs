use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tracing::debug;

use crate::mcp::protocol::{JsonRpcError, JsonRpcResponse};
use crate::report::{FailureBody, ReportSuccess};
use crate::state::AppState;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;
    let base = system_config.base_path.trim_end_matches('/');
    let max_duration = Duration::from_secs(system_config.max_duration_secs);

    Router::new()
        // Health check
        .route(&format!("{}/health", base), get(health_check))

        // Tool gateway; every verb goes to the same handler
        .route(
            &format!("{}/mcp", base),
            get(mcp_endpoint)
                .post(mcp_endpoint)
                .delete(mcp_endpoint)
                .layer(TimeoutLayer::new(max_duration)),
        )

        // Report workflow proxy
        .route(&format!("{}/report", base), post(generate_report))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let info = state.mcp.info();
    Json(json!({
        "status": "ok",
        "name": info.name,
        "version": info.version
    }))
}

fn parse_error(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(JsonRpcResponse::failure(Value::Null, JsonRpcError::parse_error(message))),
    )
        .into_response()
}

async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    if body.iter().all(u8::is_ascii_whitespace) {
        return parse_error("Parse error: empty body".to_string());
    }

    let message: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => return parse_error(format!("Parse error: {}", e)),
    };

    match message {
        Value::Array(messages) if messages.is_empty() => (
            StatusCode::BAD_REQUEST,
            Json(JsonRpcResponse::failure(
                Value::Null,
                JsonRpcError::invalid_request("empty batch"),
            )),
        )
            .into_response(),
        Value::Array(messages) => {
            debug!("Batch of {} messages", messages.len());
            let responses = state.mcp.handle_batch(messages).await;
            if responses.is_empty() {
                StatusCode::ACCEPTED.into_response()
            } else {
                Json(responses).into_response()
            }
        }
        single => match state.mcp.handle(single).await {
            Some(response) => Json(response).into_response(),
            None => StatusCode::ACCEPTED.into_response(),
        },
    }
}

async fn generate_report(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ReportSuccess>, (StatusCode, Json<FailureBody>)> {
    // An unreadable body is handled like a missing `text1`
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    state.report.generate_report(&request).await.map(Json).map_err(|e| {
        let status = StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(e.to_body()))
    })
}
