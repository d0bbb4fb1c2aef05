use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use super::content::ToolResult;
use super::registry::ToolHandler;
use super::schema::{FieldSpec, ToolSchema, ValidatedArgs};
use crate::error::ToolError;

#[derive(Debug, Deserialize)]
struct TimeArgs {
    #[serde(rename = "timeZone")]
    time_zone: String,
}

pub fn parse_zone(zone: &str) -> Result<Tz, ToolError> {
    zone.trim()
        .parse::<Tz>()
        .map_err(|_| ToolError::domain(format!("유효하지 않은 시간대입니다: {}", zone)))
}

/// Korean locale rendering, e.g. `2026. 2. 19. 오전 9:32:15`.
pub fn format_korean<T: TimeZone>(at: &DateTime<T>) -> String {
    let (pm, hour) = at.hour12();
    format!(
        "{}. {}. {}. {} {}:{:02}:{:02}",
        at.year(),
        at.month(),
        at.day(),
        if pm { "오후" } else { "오전" },
        hour,
        at.minute(),
        at.second()
    )
}

pub fn now_in(zone: &str) -> Result<String, ToolError> {
    let tz = parse_zone(zone)?;
    Ok(format_korean(&Utc::now().with_timezone(&tz)))
}

pub struct TimeTool;

#[async_trait]
impl ToolHandler for TimeTool {
    fn name(&self) -> &'static str {
        "get_time"
    }

    fn description(&self) -> &'static str {
        "지정한 시간대의 현재 시간을 조회합니다"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new().field(FieldSpec::string("timeZone", "시간대"))
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolResult, ToolError> {
        let args: TimeArgs = args.parse()?;
        Ok(ToolResult::text(now_in(&args.time_zone)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_in_korean_locale() {
        let seoul: Tz = "Asia/Seoul".parse().unwrap();
        let at = Utc.with_ymd_and_hms(2026, 2, 19, 0, 32, 15).unwrap().with_timezone(&seoul);
        assert_eq!(format_korean(&at), "2026. 2. 19. 오전 9:32:15");

        let at = Utc.with_ymd_and_hms(2026, 2, 19, 6, 5, 9).unwrap().with_timezone(&seoul);
        assert_eq!(format_korean(&at), "2026. 2. 19. 오후 3:05:09");
    }

    #[test]
    fn midnight_is_twelve_am() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_korean(&at), "2026. 1. 1. 오전 12:00:00");
    }

    #[test]
    fn invalid_zone_is_a_domain_error() {
        let err = now_in("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, ToolError::Domain(ref m) if m.contains("Mars/Olympus_Mons")));
        assert!(now_in("UTC").is_ok());
    }
}
