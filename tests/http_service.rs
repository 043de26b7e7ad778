mod common;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;
use grid_dashboard::config::{DataServiceConfig, Provider};
use grid_dashboard::domain::Coordinates;
use grid_dashboard::error::FetchError;
use grid_dashboard::service::{DataService, HttpDataService};

fn service(server: &MockServer) -> HttpDataService {
    let cfg = DataServiceConfig {
        provider: Provider::Http,
        base_url: format!("{}/api/", server.uri()),
        request_timeout_secs: 5,
        ..DataServiceConfig::default()
    };
    HttpDataService::new(&cfg).unwrap()
}

#[tokio::test]
async fn fetches_energy_with_region_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/energy"))
        .and(query_param("region", "north"))
        .respond_with(ResponseTemplate::new(200).set_body_json(energy_dataset()))
        .expect(1)
        .mount(&server)
        .await;

    let data = service(&server).get_energy_data(Some("north")).await.unwrap();
    assert_eq!(data, energy_dataset());
}

#[tokio::test]
async fn upstream_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/grid/status"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = service(&server).get_grid_status().await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 503,
            message: "maintenance".to_string()
        }
    );
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/climate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "global": 1 })))
        .mount(&server)
        .await;

    let err = service(&server).get_climate_data(None).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn weather_passes_coordinates_and_validates() {
    let server = MockServer::start().await;
    let location = Coordinates::default();
    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("lat", "59.3293"))
        .and(query_param("lon", "18.0686"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_payload(location)))
        .mount(&server)
        .await;

    let weather = service(&server).get_weather_data(location).await.unwrap();
    assert_eq!(weather.location, location);
}

#[tokio::test]
async fn out_of_range_weather_is_rejected() {
    let server = MockServer::start().await;
    let mut payload = weather_payload(Coordinates::default());
    payload.current.humidity_percent = 140.0;
    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&server)
        .await;

    let err = service(&server)
        .get_weather_data(Coordinates::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    let cfg = DataServiceConfig {
        provider: Provider::Http,
        base_url: "http://127.0.0.1:1".to_string(),
        request_timeout_secs: 1,
        ..DataServiceConfig::default()
    };
    let err = HttpDataService::new(&cfg)
        .unwrap()
        .get_climate_indicators()
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}
