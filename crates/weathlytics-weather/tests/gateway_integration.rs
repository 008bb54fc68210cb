//! Integration tests for OpenWeatherGateway using wiremock.

#![allow(clippy::unwrap_used, clippy::panic)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use weathlytics_weather::{FetchErrorKind, GatewayError, OpenWeatherGateway, WeatherGateway};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEATHER_PATH: &str = "/data/2.5/weather";

fn current_body(name: &str, temp: f64, description: &str, icon: &str) -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.35, "lat": 48.85 },
        "weather": [{ "id": 800, "main": "Clear", "description": description, "icon": icon }],
        "main": { "temp": temp, "feels_like": temp - 2.0, "humidity": 60, "pressure": 1016 },
        "wind": { "speed": 3.0, "deg": 240 },
        "name": name,
        "cod": 200
    })
}

fn gateway(server: &MockServer, key: Option<&str>) -> OpenWeatherGateway {
    let url = format!("{}{}", server.uri(), WEATHER_PATH);
    OpenWeatherGateway::new(&url, key.map(str::to_string)).unwrap()
}

#[tokio::test]
async fn test_current_weather_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("Paris", 18.0, "clear sky", "01d")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = gateway(&mock_server, Some("test-key"))
        .current_weather("Paris")
        .await
        .unwrap();

    assert_eq!(result.location_name, "Paris");
    assert_eq!(result.temperature_c, 18.0);
    assert_eq!(result.feels_like_c, 16.0);
    assert_eq!(result.humidity_pct, 60);
    assert_eq!(result.wind_speed, 3.0);
    assert_eq!(result.condition_description, "clear sky");
    assert_eq!(result.condition_icon_id, "01d");
}

#[tokio::test]
async fn test_city_name_is_url_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "São Paulo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("São Paulo", 24.5, "few clouds", "02d")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = gateway(&mock_server, Some("k"))
        .current_weather("São Paulo")
        .await
        .unwrap();

    assert_eq!(result.location_name, "São Paulo");
}

#[tokio::test]
async fn test_missing_key_still_sends_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param_is_missing("appid"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway(&mock_server, None);
    assert!(!gateway.has_credential());

    let err = gateway.current_weather("London").await.unwrap_err();

    assert!(matches!(err, GatewayError::Status { status: 401, .. }));
    assert_eq!(err.kind(), FetchErrorKind::TransientFailure);
}

#[tokio::test]
async fn test_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let err = gateway(&mock_server, Some("k"))
        .current_weather("Zzzznotacity")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::CityNotFound(ref city) if city == "Zzzznotacity"));
    assert_eq!(err.kind(), FetchErrorKind::NotFound);
}

#[tokio::test]
async fn test_not_found_with_truncated_body() {
    // Promises 500 body bytes, sends 10, then hangs up
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(
                b"HTTP/1.1 404 Not Found\r\n\
                  Content-Type: application/json\r\n\
                  Content-Length: 500\r\n\r\n\
                  {\"cod\":404",
            )
            .await;
        let _ = socket.shutdown().await;
    });

    let url = format!("http://{}{}", addr, WEATHER_PATH);
    let err = OpenWeatherGateway::new(&url, Some("k".into()))
        .unwrap()
        .current_weather("Zzzznotacity")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::CityNotFound(_)), "got {:?}", err);
    assert_eq!(err.kind(), FetchErrorKind::NotFound);
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = gateway(&mock_server, Some("k"))
        .current_weather("Paris")
        .await
        .unwrap_err();

    match &err {
        GatewayError::Status { status, body } => {
            assert_eq!(*status, 503);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert_eq!(err.kind(), FetchErrorKind::TransientFailure);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Paris",
            "weather": []
        })))
        .mount(&mock_server)
        .await;

    let err = gateway(&mock_server, Some("k"))
        .current_weather("Paris")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Parse(_)), "got {:?}", err);
    assert_eq!(err.kind(), FetchErrorKind::TransientFailure);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Nothing listens on port 1
    let gateway = OpenWeatherGateway::new("http://127.0.0.1:1/data/2.5/weather", Some("k".into()))
        .unwrap();

    let err = gateway.current_weather("Paris").await.unwrap_err();

    assert!(matches!(err, GatewayError::Network(_)), "got {:?}", err);
    assert_eq!(err.kind(), FetchErrorKind::TransientFailure);
}
