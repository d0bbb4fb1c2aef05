use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

use super::content::ToolResult;
use super::registry::ToolHandler;
use super::schema::{FieldSpec, ToolSchema, ValidatedArgs};
use crate::config::UpstreamConfig;
use crate::error::ToolError;

pub struct WeatherDefaults {
    pub timezone: &'static str,
    pub forecast_days: u32,
    pub max_forecast_days: u32,
}

pub const DEFAULTS: WeatherDefaults = WeatherDefaults {
    timezone: "auto",
    forecast_days: 3,
    max_forecast_days: 16,
};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,weather_code";

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    latitude: f64,
    longitude: f64,
    timezone: String,
    forecast_days: u32,
}

#[derive(Debug, Serialize)]
pub struct WeatherReport {
    pub location: Location,
    pub current: Option<Current>,
    pub daily: Option<Daily>,
    pub units: Units,
}

#[derive(Debug, Serialize)]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub elevation: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct Current {
    pub temperature: Value,
    pub humidity: Value,
    pub weather_code: Value,
    pub wind_speed: Value,
    pub time: Value,
}

#[derive(Debug, Serialize)]
pub struct Daily {
    pub time: Value,
    pub temperature_max: Value,
    pub temperature_min: Value,
    pub precipitation: Value,
    pub weather_code: Value,
}

#[derive(Debug, Serialize)]
pub struct Units {
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
    pub precipitation: String,
}

/// One object section of the payload. Each is read on its own, so a malformed
/// section leaves the others intact.
fn section<'a>(body: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    body.get(key).and_then(Value::as_object)
}

fn field(section: &Map<String, Value>, key: &str) -> Value {
    section.get(key).cloned().unwrap_or(Value::Null)
}

fn unit(section: Option<&Map<String, Value>>, key: &str, fallback: &str) -> String {
    section
        .and_then(|s| s.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// True when the body carries a truthy `error` flag.
fn reports_error(body: &Value) -> bool {
    match body.get("error") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

/// Flatten the provider's nested payload.
pub fn reshape(body: &Value) -> Result<WeatherReport, ToolError> {
    if reports_error(body) {
        let reason = body
            .get("reason")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("알 수 없는 오류");
        return Err(ToolError::domain(format!("Open-Meteo API 오류: {}", reason)));
    }

    let current = section(body, "current").map(|c| Current {
        temperature: field(c, "temperature_2m"),
        humidity: field(c, "relative_humidity_2m"),
        weather_code: field(c, "weather_code"),
        wind_speed: field(c, "wind_speed_10m"),
        time: field(c, "time"),
    });

    let daily = section(body, "daily").map(|d| Daily {
        time: field(d, "time"),
        temperature_max: field(d, "temperature_2m_max"),
        temperature_min: field(d, "temperature_2m_min"),
        precipitation: field(d, "precipitation_sum"),
        weather_code: field(d, "weather_code"),
    });

    let current_units = section(body, "current_units");
    let daily_units = section(body, "daily_units");

    Ok(WeatherReport {
        location: Location {
            latitude: body.get("latitude").and_then(Value::as_f64),
            longitude: body.get("longitude").and_then(Value::as_f64),
            timezone: body
                .get("timezone")
                .and_then(Value::as_str)
                .map(str::to_string),
            elevation: body.get("elevation").and_then(Value::as_f64),
        },
        current,
        daily,
        units: Units {
            temperature: unit(current_units, "temperature_2m", "°C"),
            humidity: unit(current_units, "relative_humidity_2m", "%"),
            wind_speed: unit(current_units, "wind_speed_10m", "km/h"),
            precipitation: unit(daily_units, "precipitation_sum", "mm"),
        },
    })
}

/// Coordinate forecast lookup against an Open-Meteo-compatible API.
pub struct WeatherTool {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl WeatherTool {
    pub fn new(client: Client, upstream: &UpstreamConfig) -> Self {
        Self {
            client,
            base_url: upstream.weather_base_url.trim_end_matches('/').to_string(),
            user_agent: upstream.user_agent.clone(),
        }
    }
}

#[async_trait]
impl ToolHandler for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "좌표 기반 날씨 예보를 조회합니다 (Open-Meteo API)"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new()
            .field(FieldSpec::number("latitude", "위도 (WGS84)").range(-90.0, 90.0))
            .field(FieldSpec::number("longitude", "경도 (WGS84)").range(-180.0, 180.0))
            .field(
                FieldSpec::string("timezone", "시간대 (기본값: auto - 자동 감지)")
                    .with_default(DEFAULTS.timezone),
            )
            .field(
                FieldSpec::integer("forecast_days", "예보 일수 (기본값: 3, 최대: 16)")
                    .range(1.0, DEFAULTS.max_forecast_days as f64)
                    .with_default(DEFAULTS.forecast_days),
            )
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolResult, ToolError> {
        let args: WeatherArgs = args.parse()?;

        let url = format!("{}/v1/forecast", self.base_url);
        let latitude = args.latitude.to_string();
        let longitude = args.longitude.to_string();
        let forecast_days = args.forecast_days.to_string();
        debug!("Forecast for {},{} ({} days)", latitude, longitude, forecast_days);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("timezone", args.timezone.as_str()),
                ("forecast_days", forecast_days.as_str()),
                ("current", CURRENT_FIELDS),
                ("daily", DAILY_FIELDS),
            ])
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                error!("Open-Meteo request failed: {}", e);
                ToolError::network(format!("Open-Meteo 요청 실패: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::upstream(
                status.as_u16(),
                format!("Open-Meteo API 오류: {}", status.as_u16()),
            ));
        }

        let body: Value = response.json().await.map_err(|e| {
            ToolError::upstream(502, format!("Open-Meteo 응답을 해석할 수 없습니다: {}", e))
        })?;

        let report = reshape(&body)?;
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| ToolError::domain(e.to_string()))?;
        Ok(ToolResult::text(text))
    }
}
