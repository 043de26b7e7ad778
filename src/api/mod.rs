pub mod climate;
pub mod domain;
pub mod energy;
pub mod error;
pub mod health;
pub mod response;
pub mod scene;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{app::AppState, config::Config};

pub fn router(state: AppState, cfg: &Config) -> Router {
    let v1 = Router::new()
        .nest("/energy", energy::routes())
        .nest("/climate", climate::routes())
        .nest("/scene", scene::routes());

    let mut router = Router::new()
        .nest("/api/v1", v1)
        .route("/health", get(health::health_check))
        .route("/healthz", get(health::healthz))
        .with_state(state);

    if cfg.server.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static(
                "http://localhost:3000",
            )))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(cfg.server.request_timeout_secs),
                )),
        )
        .layer(TraceLayer::new_for_http())
}
