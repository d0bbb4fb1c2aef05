use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::Regex;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub upstream_config: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Upper bound on a single gateway call, in seconds.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
    #[serde(default = "default_server_name")]
    pub server_name: String,
    #[serde(default = "default_server_description")]
    pub server_description: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_path() -> String {
    "/api".to_string()
}

fn default_max_duration_secs() -> u64 {
    60
}

fn default_server_name() -> String {
    "heat-sync-mcp-server".to_string()
}

fn default_server_description() -> String {
    "Heat-Sync 사고 대응 MCP 서버".to_string()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            max_duration_secs: default_max_duration_secs(),
            server_name: default_server_name(),
            server_description: default_server_description(),
        }
    }
}

/// Endpoints and identities of the external services.
///
/// Credentials are not stored here; only the names of the environment
/// variables holding them, which are read on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_image_steps")]
    pub image_inference_steps: u32,
    #[serde(default = "default_image_token_env")]
    pub image_token_env: String,
    #[serde(default = "default_geocode_base_url")]
    pub geocode_base_url: String,
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    #[serde(default = "default_workflow_base_url")]
    pub workflow_base_url: String,
    #[serde(default = "default_report_api_key_env")]
    pub report_api_key_env: String,
    #[serde(default = "default_report_user")]
    pub report_user: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_image_base_url() -> String {
    "https://router.huggingface.co/hf-inference".to_string()
}

fn default_image_model() -> String {
    "black-forest-labs/FLUX.1-schnell".to_string()
}

fn default_image_steps() -> u32 {
    5
}

fn default_image_token_env() -> String {
    "HF_TOKEN".to_string()
}

fn default_geocode_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_workflow_base_url() -> String {
    "https://api.aiu.gscaltex.com/ext/v1".to_string()
}

fn default_report_api_key_env() -> String {
    "MISO_API_KEY".to_string()
}

fn default_report_user() -> String {
    "heat-sync-dashboard".to_string()
}

fn default_user_agent() -> String {
    format!("heat-sync-backend/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            image_base_url: default_image_base_url(),
            image_model: default_image_model(),
            image_inference_steps: default_image_steps(),
            image_token_env: default_image_token_env(),
            geocode_base_url: default_geocode_base_url(),
            weather_base_url: default_weather_base_url(),
            workflow_base_url: default_workflow_base_url(),
            report_api_key_env: default_report_api_key_env(),
            report_user: default_report_user(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let content = substitute_env(&fs::read_to_string(path)?)?;
        Self::parse(path, &content)
    }

    /// Pick the configuration to run with.
    ///
    /// An `explicit` path must load or startup fails. Without one, the first
    /// fallback that loads wins, and the built-in defaults apply if none does.
    pub fn resolve(explicit: Option<&str>, fallbacks: &[&str]) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::load(path)
                .map_err(|e| anyhow::anyhow!("Could not load configuration from {}: {}", path, e))?;
            info!("Loaded configuration from: {}", path);
            return Ok(config);
        }

        for path in fallbacks {
            match Self::load(path) {
                Ok(config) => {
                    info!("Loaded configuration from: {}", path);
                    return Ok(config);
                }
                Err(e) => debug!("Failed to load config from {}: {}", path, e),
            }
        }

        info!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    fn parse(path: &str, content: &str) -> Result<Self> {
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(serde_yaml::from_str(content)?)
        }
    }
}

/// Replace `${VAR_NAME}` with the value of the environment variable.
/// Unset variables are left as written.
fn substitute_env(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    Ok(pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned())
}
