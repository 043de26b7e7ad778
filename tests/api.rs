mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use common::*;
use grid_dashboard::{api, app::AppState, config::Config};

fn manual_config() -> Config {
    let mut cfg = Config::default();
    for refresh in [&mut cfg.energy, &mut cfg.climate] {
        refresh.auto_refresh = false;
        refresh.real_time_monitoring = false;
    }
    cfg
}

async fn test_app(initialize: bool) -> (Router, AppState, Arc<ScriptedService>) {
    let svc = ScriptedService::new();
    let cfg = manual_config();
    let state = AppState::new(cfg.clone(), svc.clone()).unwrap();
    if initialize {
        state.initialize().await;
    }
    (api::router(state.clone(), &cfg), state, svc)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn energy_view_includes_snapshot_and_metrics() {
    let (app, _, _) = test_app(true).await;

    let (status, body) = send_json(&app, Method::GET, "/api/v1/energy", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["data"]["totals"]["totalGeneration"], 1000.0);
    assert!(data["liveStatus"].is_object());
    assert_eq!(data["timeRange"], "24h");
    assert_eq!(data["metrics"]["gridHealthScore"], 82);
    assert_eq!(data["refreshPolicy"]["autoRefresh"], false);
    assert_eq!(data["activeTimers"], json!([]));
}

#[tokio::test]
async fn health_reports_store_state() {
    let (app, _, _) = test_app(false).await;
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["checks"]["energy"]["status"], "unavailable");

    let (app, _, _) = test_app(true).await;
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn optimize_without_data_conflicts() {
    let (app, _, _) = test_app(false).await;
    let (status, body) = send_json(&app, Method::POST, "/api/v1/energy/optimize", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "PreconditionFailed");
}

#[tokio::test]
async fn node_routes_without_data_conflict() {
    let (app, _, _) = test_app(false).await;

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        "/api/v1/energy/nodes/north-1",
        Some(json!({ "status": "offline" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "PreconditionFailed");

    let (status, _) = send(&app, Method::DELETE, "/api/v1/energy/nodes/north-1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn node_routes_round_trip() {
    let (app, state, _) = test_app(true).await;

    let node = json!({
        "name": "Harbour",
        "regionId": "south",
        "load": 40.0,
        "capacity": 80.0,
        "efficiency": 93.0,
        "status": "online"
    });
    let (status, body) = send_json(&app, Method::POST, "/api/v1/energy/nodes", Some(node)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/energy/nodes/{id}");
    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "offline" }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send_json(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "offline");
    assert_eq!(state.energy.read(|s| s.data.as_ref().map(|d| d.nodes.len())), Some(2));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn region_selection_refetches_for_region() {
    let (app, state, svc) = test_app(true).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/api/v1/climate/region",
        Some(json!({ "region": "north" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["selectedRegion"], "north");
    assert_eq!(
        svc.requested_regions.lock().last().cloned(),
        Some(Some("north".to_string()))
    );
    assert_eq!(state.energy.read(|s| s.selected_region.clone()), None);

    let (status, _) = send(&app, Method::GET, "/api/v1/climate/regions/atlantis", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send_json(&app, Method::GET, "/api/v1/climate/regions/north", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["riskLevel"], "high");
}

#[tokio::test]
async fn refresh_policy_update_is_validated() {
    let (app, state, _) = test_app(true).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/energy/refresh-policy",
        Some(json!({ "refreshIntervalMs": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/api/v1/energy/refresh-policy",
        Some(json!({ "autoRefresh": true, "refreshIntervalMs": 15000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["autoRefresh"], true);
    assert_eq!(body["refreshInterval"], 15000);
    assert_eq!(state.energy.active_timers().len(), 1);
    state.shutdown();
}

#[tokio::test]
async fn csv_export_sets_download_headers() {
    let (app, _, _) = test_app(true).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/energy/export?format=csv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv");
    let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("energy-export-"));
    assert!(disposition.ends_with(".csv\""));
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"path,value\n"));
}

#[tokio::test]
async fn scene_presets_and_import() {
    let (app, state, _) = test_app(false).await;

    let uri = "/api/v1/scene/presets/quality/low";
    let (status, body) = send_json(&app, Method::PUT, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["renderQuality"]["shadows"], false);

    let (status, _) = send(&app, Method::PUT, "/api/v1/scene/presets/quality/extreme", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/api/v1/scene/animation-speed",
        Some(json!({ "speed": 99.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["animationSpeed"], 5.0);

    let (status, _) = send(&app, Method::POST, "/api/v1/scene/import", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/scene/import",
        Some(json!({ "animationSpeed": 2.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.scene.config().animation_speed, 2.0);
    assert!(!state.scene.config().render_quality.shadows);

    let (status, _) = send(&app, Method::POST, "/api/v1/scene/reset", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.scene.config().animation_speed, 1.0);
}
