use reqwest::Client;
use std::sync::Arc;

use crate::config::Config;
use crate::env::EnvSource;
use crate::mcp::{McpServer, ServerInfo};
use crate::report::ReportProxy;
use crate::tools::standard_registry;

/// Shared, read-only handles. Nothing here changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub mcp: Arc<McpServer>,
    pub report: Arc<ReportProxy>,
}

impl AppState {
    pub fn new(config: Config, env: Arc<dyn EnvSource>) -> Self {
        let client = Client::new();
        let upstream = &config.upstream_config;

        let registry = Arc::new(standard_registry(client.clone(), upstream, env.clone()));
        let info = ServerInfo {
            name: config.system_config.server_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: config.system_config.server_description.clone(),
        };
        let mcp = Arc::new(McpServer::new(registry, info));
        let report = Arc::new(ReportProxy::new(client, upstream, env));

        Self {
            config,
            mcp,
            report,
        }
    }
}
