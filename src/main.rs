mod config;
mod env;
mod error;
mod mcp;
mod report;
mod routes;
mod state;
mod tools;

#[cfg(test)]
mod tests;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use env::ProcessEnv;
use state::AppState;

fn load_config() -> Result<Config> {
    let explicit = std::env::var("CONFIG_PATH").ok();
    Config::resolve(explicit.as_deref(), &["conf.yaml", "conf.json"])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("heat_sync_backend=debug,tower_http=debug")),
        )
        .init();

    let config = load_config()?;

    let app_state = AppState::new(config.clone(), Arc::new(ProcessEnv));
    let app = build_app(app_state);

    let host: std::net::IpAddr = config.system_config.host.parse()?;
    let addr = SocketAddr::new(host, config.system_config.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
