//! Integration tests against mocked upstream services and the full router.

mod tool_mock_tests;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::Config;
use crate::env::StaticEnv;
use crate::state::AppState;

/// Address nothing listens on, for transport failures.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Default config with every upstream pointed at `base_url`.
pub fn config_for(base_url: &str) -> Config {
    let mut config = Config::default();
    let upstream = &mut config.upstream_config;
    upstream.image_base_url = base_url.to_string();
    upstream.geocode_base_url = base_url.to_string();
    upstream.weather_base_url = base_url.to_string();
    upstream.workflow_base_url = base_url.to_string();
    config
}

pub fn app_with(config: Config, env: StaticEnv) -> Router {
    crate::build_app(AppState::new(config, Arc::new(env)))
}

/// Send one request and return the status and the JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
