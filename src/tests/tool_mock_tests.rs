//! Tool handlers against WireMock stand-ins for the external providers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use reqwest::Client;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, header, headers, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::env::StaticEnv;
    use crate::error::ToolError;
    use crate::tests::{config_for, UNREACHABLE};
    use crate::tools::content::ContentItem;
    use crate::tools::{standard_registry, ToolRegistry, ToolResult};

    fn registry(base_url: &str, env: StaticEnv) -> ToolRegistry {
        let config = config_for(base_url);
        standard_registry(Client::new(), &config.upstream_config, Arc::new(env))
    }

    fn text_of(result: &ToolResult) -> String {
        result.first_text().expect("text content").to_string()
    }

    #[tokio::test]
    async fn test_greeting_and_calculator_end_to_end() {
        let tools = registry(UNREACHABLE, StaticEnv::new());

        let result = tools
            .invoke("greeting", &json!({"name": "Min", "language": "en"}))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "Hello, Min! 👋");

        let result = tools.invoke("greeting", &json!({"name": "민수"})).await.unwrap();
        assert_eq!(text_of(&result), "안녕하세요, 민수님! 😊");

        let result = tools
            .invoke("calculator", &json!({"operation": "add", "a": 2, "b": 3}))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "2 + 3 = 5");

        let result = tools
            .invoke("calculator", &json!({"operation": "divide", "a": 7, "b": 2}))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "7 ÷ 2 = 3.5");

        let err = tools
            .invoke("calculator", &json!({"operation": "divide", "a": 1, "b": 0}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Domain(_)));
    }

    #[tokio::test]
    async fn test_get_time_rejects_unknown_zone() {
        let tools = registry(UNREACHABLE, StaticEnv::new());
        let ok = tools.invoke("get_time", &json!({"timeZone": "Asia/Seoul"})).await.unwrap();
        assert!(text_of(&ok).contains(". "));

        let err = tools
            .invoke("get_time", &json!({"timeZone": "Not/AZone"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Domain(_)));
    }

    #[tokio::test]
    async fn test_geocode_search() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "서울 마포구 상암동"))
            .and(query_param("format", "jsonv2"))
            .and(query_param("limit", "5"))
            .and(query_param("addressdetails", "0"))
            .and(headers("accept-language", vec!["ko", "en"]))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "display_name": "상암동, 마포구, 서울특별시, 대한민국",
                    "lat": "37.5791",
                    "lon": "126.8899",
                    "type": "suburb",
                    "importance": 0.45
                }
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let tools = registry(&mock_server.uri(), StaticEnv::new());
        let result = tools
            .invoke(
                "geocode",
                &json!({"query": "서울 마포구 상암동", "limit": 5, "addressdetails": false}),
            )
            .await
            .unwrap();

        let matches: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(matches[0]["name"], "상암동, 마포구, 서울특별시, 대한민국");
        assert_eq!(matches[0]["latitude"], json!(37.5791));
        assert_eq!(matches[0]["longitude"], json!(126.8899));
        assert_eq!(matches[0]["type"], "suburb");
        assert!(matches[0].get("address").is_none());
    }

    #[tokio::test]
    async fn test_geocode_defaults_and_empty_result() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("limit", "1"))
            .and(query_param("addressdetails", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let tools = registry(&mock_server.uri(), StaticEnv::new());
        let result = tools.invoke("geocode", &json!({"query": "Nowhere"})).await.unwrap();

        assert!(!result.is_error);
        assert_eq!(text_of(&result), "\"Nowhere\"에 대한 검색 결과가 없습니다.");
    }

    #[tokio::test]
    async fn test_geocode_upstream_status_is_surfaced() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let tools = registry(&mock_server.uri(), StaticEnv::new());
        let err = tools.invoke("geocode", &json!({"query": "Seoul"})).await.unwrap_err();

        match err {
            ToolError::Upstream { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Nominatim API 오류: 503");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_geocode_limit_out_of_range_makes_no_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let tools = registry(&mock_server.uri(), StaticEnv::new());
        for limit in [0, 41, 100] {
            let err = tools
                .invoke("geocode", &json!({"query": "Seoul", "limit": limit}))
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_geocode_transport_failure_is_a_network_error() {
        let tools = registry(UNREACHABLE, StaticEnv::new());
        let err = tools.invoke("geocode", &json!({"query": "Seoul"})).await.unwrap_err();
        assert!(matches!(err, ToolError::Network(_)));
    }

    #[tokio::test]
    async fn test_weather_forecast_is_reshaped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "37.5665"))
            .and(query_param("longitude", "126.978"))
            .and(query_param("timezone", "auto"))
            .and(query_param("forecast_days", "3"))
            .and(query_param(
                "current",
                "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m",
            ))
            .and(query_param(
                "daily",
                "temperature_2m_max,temperature_2m_min,precipitation_sum,weather_code",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": 37.55,
                "longitude": 127.0,
                "timezone": "Asia/Seoul",
                "elevation": 38.0,
                "current_units": {"temperature_2m": "°C", "relative_humidity_2m": "%", "wind_speed_10m": "km/h"},
                "current": {
                    "time": "2026-02-19T09:30",
                    "temperature_2m": -2.4,
                    "relative_humidity_2m": 61,
                    "weather_code": 3,
                    "wind_speed_10m": 7.9
                },
                "daily_units": {"precipitation_sum": "mm"},
                "daily": {
                    "time": ["2026-02-19", "2026-02-20", "2026-02-21"],
                    "temperature_2m_max": [3.1, 4.0, 5.2],
                    "temperature_2m_min": [-5.0, -3.2, -1.1],
                    "precipitation_sum": [0.0, 1.2, 0.0],
                    "weather_code": [3, 61, 1]
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let tools = registry(&mock_server.uri(), StaticEnv::new());
        let result = tools
            .invoke("get_weather", &json!({"latitude": 37.5665, "longitude": 126.978}))
            .await
            .unwrap();

        let report: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(report["location"]["timezone"], "Asia/Seoul");
        assert_eq!(report["current"]["temperature"], json!(-2.4));
        assert_eq!(report["current"]["humidity"], json!(61));
        assert_eq!(report["current"]["wind_speed"], json!(7.9));
        assert_eq!(report["daily"]["temperature_max"], json!([3.1, 4.0, 5.2]));
        assert_eq!(report["daily"]["precipitation"], json!([0.0, 1.2, 0.0]));
        assert_eq!(report["units"]["precipitation"], "mm");
    }

    #[tokio::test]
    async fn test_weather_out_of_range_coordinates_make_no_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let tools = registry(&mock_server.uri(), StaticEnv::new());
        let bad = [
            json!({"latitude": 90.5, "longitude": 0}),
            json!({"latitude": -91, "longitude": 0}),
            json!({"latitude": 0, "longitude": 180.1}),
            json!({"latitude": 0, "longitude": -181}),
            json!({"latitude": 0, "longitude": 0, "forecast_days": 17}),
        ];
        for args in bad {
            let err = tools.invoke("get_weather", &args).await.unwrap_err();
            assert!(matches!(err, ToolError::Validation(_)), "{args} should fail validation");
        }
    }

    #[tokio::test]
    async fn test_weather_logical_error_and_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("timezone", "Mars/Base"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": true,
                "reason": "Invalid timezone"
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("timezone", "auto"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": true,
                "reason": "Cannot initialize"
            })))
            .mount(&mock_server)
            .await;

        let tools = registry(&mock_server.uri(), StaticEnv::new());

        let err = tools
            .invoke(
                "get_weather",
                &json!({"latitude": 10, "longitude": 10, "timezone": "Mars/Base"}),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Open-Meteo API 오류: Invalid timezone");
        assert!(matches!(err, ToolError::Domain(_)));

        let err = tools
            .invoke("get_weather", &json!({"latitude": 10, "longitude": 10}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Upstream { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_image_without_credential_makes_no_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let tools = registry(&mock_server.uri(), StaticEnv::new());
        let err = tools
            .invoke("generate_image", &json!({"prompt": "ruptured pipe"}))
            .await
            .unwrap_err();

        match err {
            ToolError::Configuration(message) => assert!(message.contains("HF_TOKEN")),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_image_generation_wraps_bytes() {
        let mock_server = MockServer::start().await;
        let image_bytes: Vec<u8> = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

        Mock::given(method("POST"))
            .and(path("/models/black-forest-labs/FLUX.1-schnell"))
            .and(header("authorization", "Bearer hf_test_token"))
            .and(body_json(json!({
                "inputs": "ruptured pipe at night",
                "parameters": {"num_inference_steps": 5}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(image_bytes.clone(), "image/jpeg"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let env = StaticEnv::new().with("HF_TOKEN", "hf_test_token");
        let tools = registry(&mock_server.uri(), env);
        let result = tools
            .invoke("generate_image", &json!({"prompt": "ruptured pipe at night"}))
            .await
            .unwrap();

        assert_eq!(
            result.content,
            vec![ContentItem::Image {
                data: STANDARD.encode(&image_bytes),
                mime_type: "image/jpeg".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_image_provider_failure_is_upstream() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let env = StaticEnv::new().with("HF_TOKEN", "hf_test_token");
        let tools = registry(&mock_server.uri(), env);
        let err = tools
            .invoke("generate_image", &json!({"prompt": "x"}))
            .await
            .unwrap_err();

        match err {
            ToolError::Upstream { status, message } => {
                assert_eq!(status, 500);
                assert!(message.starts_with("이미지 생성 중 오류가 발생했습니다"));
                assert!(message.contains("model overloaded"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
