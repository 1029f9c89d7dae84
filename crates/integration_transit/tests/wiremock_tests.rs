//! Integration tests for the departure monitor client (wiremock-based)

use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_transit::{
    DepartureMode, DepartureMonitorResponse, ResponseDump, TfnswTransitClient, TransitClient,
    TransitConfig, TransitError,
};

fn config_for_mock(base_url: &str) -> TransitConfig {
    TransitConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..TransitConfig::default()
    }
}

const fn sample_departures_json() -> &'static str {
    r#"{
        "version": "10.2.1.42",
        "stopEvents": [
            {
                "isRealtimeControlled": true,
                "departureTimePlanned": "2026-03-02T21:15:00Z",
                "departureTimeEstimated": "2026-03-02T21:20:00Z",
                "transportation": {
                    "id": "nsw:020T1: :H:sj2",
                    "disassembledName": "T1",
                    "number": "T1 North Shore & Western Line",
                    "destination": { "name": "Hornsby" }
                }
            },
            {
                "departureTimePlanned": "2026-03-02T21:25:00Z",
                "transportation": {
                    "disassembledName": "T9",
                    "number": "T9 Northern Line",
                    "destination": { "name": "Gordon" }
                }
            }
        ]
    }"#
}

#[tokio::test]
async fn test_train_query_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tp/departure_mon"))
        .and(query_param("type_dm", "platform"))
        .and(query_param("name_dm", "2000274"))
        .and(query_param("itdDate", "20260303"))
        .and(query_param("itdTime", "0810"))
        .and(query_param("outputFormat", "rapidJSON"))
        .and(query_param("exclMOT_5", "1"))
        .and(query_param_is_missing("exclMOT_1"))
        .and(header("Authorization", "apikey test-key"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_departures_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = TfnswTransitClient::new(&config_for_mock(&server.uri())).unwrap();

    let body = client
        .fetch_departure_monitor(DepartureMode::Train, "2000274", "test-key", "20260303", "0810")
        .await
        .unwrap();

    let response = DepartureMonitorResponse::from_value(&body).unwrap();
    assert_eq!(response.stop_events.len(), 2);
    assert_eq!(response.stop_events[0].destination_name(), Some("Hornsby"));
    assert_eq!(response.stop_events[1].disassembled_name(), Some("T9"));
}

#[tokio::test]
async fn test_bus_query_uses_stop_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tp/departure_mon"))
        .and(query_param("type_dm", "stop"))
        .and(query_param("name_dm", "200060"))
        .and(query_param("exclMOT_1", "1"))
        .and(query_param_is_missing("exclMOT_5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{ "stopEvents": [] }"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = TfnswTransitClient::new(&config_for_mock(&server.uri())).unwrap();

    let body = client
        .fetch_departure_monitor(DepartureMode::Bus, "200060", "test-key", "20260303", "0810")
        .await
        .unwrap();

    assert!(body["stopEvents"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_identifier_is_url_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tp/departure_mon"))
        .and(query_param("name_dm", "Central Station & Co"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = TfnswTransitClient::new(&config_for_mock(&server.uri())).unwrap();

    let result = client
        .fetch_departure_monitor(
            DepartureMode::Train,
            "Central Station & Co",
            "test-key",
            "20260303",
            "0810",
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_server_error_is_request_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tp/departure_mon"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = TfnswTransitClient::new(&config_for_mock(&server.uri())).unwrap();

    let err = client
        .fetch_departure_monitor(DepartureMode::Train, "2000274", "k", "20260303", "0810")
        .await
        .unwrap_err();

    assert!(matches!(err, TransitError::RequestFailed { status: 500 }));
    assert!(!err.is_network());
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = TfnswTransitClient::new(&config_for_mock(&server.uri())).unwrap();

    let err = client
        .fetch_departure_monitor(DepartureMode::Bus, "200060", "wrong", "20260303", "0810")
        .await
        .unwrap_err();

    assert!(matches!(err, TransitError::RequestFailed { status: 401 }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = TfnswTransitClient::new(&config_for_mock(&server.uri())).unwrap();

    let err = client
        .fetch_departure_monitor(DepartureMode::Train, "2000274", "k", "20260303", "0810")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TransitError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = TfnswTransitClient::new(&config_for_mock(&server.uri())).unwrap();

    let err = client
        .fetch_departure_monitor(DepartureMode::Train, "2000274", "k", "20260303", "0810")
        .await
        .unwrap_err();

    assert!(matches!(err, TransitError::ParseError(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Nothing listens on port 9 locally
    let client = TfnswTransitClient::new(&config_for_mock("http://127.0.0.1:9")).unwrap();

    let err = client
        .fetch_departure_monitor(DepartureMode::Train, "2000274", "k", "20260303", "0810")
        .await
        .unwrap_err();

    assert!(err.is_network());
}

#[tokio::test]
async fn test_debug_dump_writes_response_file() {
    let server = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_departures_json()))
        .mount(&server)
        .await;

    let dump = ResponseDump::create(tmp.path().join("response")).unwrap();
    let client = TfnswTransitClient::new(&config_for_mock(&server.uri()))
        .unwrap()
        .with_response_dump(dump);

    client
        .fetch_departure_monitor(DepartureMode::Train, "2000274", "k", "20260303", "0810")
        .await
        .unwrap();

    let files: Vec<String> = std::fs::read_dir(tmp.path().join("response"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();

    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("_train.json"));
}

#[tokio::test]
async fn test_failed_dump_does_not_fail_fetch() {
    let server = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_departures_json()))
        .mount(&server)
        .await;

    let dir = tmp.path().join("response");
    let dump = ResponseDump::create(&dir).unwrap();
    std::fs::remove_dir(&dir).unwrap();

    let client = TfnswTransitClient::new(&config_for_mock(&server.uri()))
        .unwrap()
        .with_response_dump(dump);

    let result = client
        .fetch_departure_monitor(DepartureMode::Bus, "200060", "k", "20260303", "0810")
        .await;

    assert!(result.is_ok());
}
