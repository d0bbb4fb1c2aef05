pub mod content;
pub mod registry;
pub mod schema;

pub mod calculator;
pub mod geocode;
pub mod greeting;
pub mod image;
pub mod time;
pub mod weather;

pub use content::ToolResult;
pub use registry::ToolRegistry;

use reqwest::Client;
use std::sync::Arc;
use tracing::info;

use crate::config::UpstreamConfig;
use crate::env::EnvSource;

/// Registry with every built-in tool, sharing one HTTP client.
pub fn standard_registry(
    client: Client,
    upstream: &UpstreamConfig,
    env: Arc<dyn EnvSource>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(greeting::GreetingTool));
    registry.register(Arc::new(calculator::CalculatorTool));
    registry.register(Arc::new(time::TimeTool));
    registry.register(Arc::new(image::ImageTool::new(client.clone(), upstream, env)));
    registry.register(Arc::new(geocode::GeocodeTool::new(client.clone(), upstream)));
    registry.register(Arc::new(weather::WeatherTool::new(client, upstream)));
    info!("Tool registry ready with {} tools", registry.len());
    registry
}
