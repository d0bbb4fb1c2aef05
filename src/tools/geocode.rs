use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use super::content::ToolResult;
use super::registry::ToolHandler;
use super::schema::{FieldSpec, ToolSchema, ValidatedArgs};
use crate::config::UpstreamConfig;
use crate::error::ToolError;

pub struct GeocodeDefaults {
    pub limit: u32,
    pub max_limit: u32,
    pub addressdetails: bool,
}

pub const DEFAULTS: GeocodeDefaults = GeocodeDefaults {
    limit: 1,
    max_limit: 40,
    addressdetails: true,
};

#[derive(Debug, Deserialize)]
struct GeocodeArgs {
    query: String,
    limit: u32,
    addressdetails: bool,
}

#[derive(Debug, Deserialize)]
struct Place {
    display_name: Option<String>,
    lat: Option<Value>,
    lon: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    importance: Option<f64>,
    address: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Match {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    importance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<Value>,
}

/// Nominatim sends coordinates as strings.
fn coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

impl From<Place> for Match {
    fn from(place: Place) -> Self {
        Self {
            latitude: coordinate(place.lat.as_ref()),
            longitude: coordinate(place.lon.as_ref()),
            name: place.display_name,
            kind: place.kind,
            importance: place.importance,
            address: place.address,
        }
    }
}

/// Free-text place search against a Nominatim-compatible API.
pub struct GeocodeTool {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl GeocodeTool {
    pub fn new(client: Client, upstream: &UpstreamConfig) -> Self {
        Self {
            client,
            base_url: upstream.geocode_base_url.trim_end_matches('/').to_string(),
            user_agent: upstream.user_agent.clone(),
        }
    }
}

#[async_trait]
impl ToolHandler for GeocodeTool {
    fn name(&self) -> &'static str {
        "geocode"
    }

    fn description(&self) -> &'static str {
        "주소 또는 도시명으로 좌표를 검색합니다 (OpenStreetMap Nominatim)"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new()
            .field(FieldSpec::string("query", "검색할 도시 이름 또는 주소"))
            .field(
                FieldSpec::integer("limit", "반환할 결과 수 (기본값: 1, 최대: 40)")
                    .range(1.0, DEFAULTS.max_limit as f64)
                    .with_default(DEFAULTS.limit),
            )
            .field(
                FieldSpec::boolean("addressdetails", "주소 세부 정보 포함 여부")
                    .with_default(DEFAULTS.addressdetails),
            )
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolResult, ToolError> {
        let args: GeocodeArgs = args.parse()?;
        let limit = args.limit.clamp(1, DEFAULTS.max_limit);

        let url = format!("{}/search", self.base_url);
        let limit_param = limit.to_string();
        debug!("Geocoding '{}' (limit {})", args.query, limit);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", args.query.as_str()),
                ("format", "jsonv2"),
                ("limit", limit_param.as_str()),
                ("addressdetails", if args.addressdetails { "1" } else { "0" }),
            ])
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT_LANGUAGE, "ko,en")
            .send()
            .await
            .map_err(|e| {
                error!("Nominatim request failed: {}", e);
                ToolError::network(format!("Nominatim 요청 실패: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::upstream(
                status.as_u16(),
                format!("Nominatim API 오류: {}", status.as_u16()),
            ));
        }

        let places: Vec<Place> = response.json().await.map_err(|e| {
            ToolError::upstream(502, format!("Nominatim 응답을 해석할 수 없습니다: {}", e))
        })?;

        if places.is_empty() {
            return Ok(ToolResult::text(format!(
                "\"{}\"에 대한 검색 결과가 없습니다.",
                args.query
            )));
        }

        let matches: Vec<Match> = places.into_iter().map(Match::from).collect();
        let text = serde_json::to_string_pretty(&matches)
            .map_err(|e| ToolError::domain(e.to_string()))?;
        Ok(ToolResult::text(text))
    }
}
