use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    app::AppState,
    sync::{Domain, DomainStore},
};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    energy: ComponentHealth,
    climate: ComponentHealth,
}

/// Health status of a domain store
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl ComponentHealth {
    fn of<D: Domain>(store: &DomainStore<D>) -> Self {
        store.read(|s| {
            let slots = [&s.errors.primary, &s.errors.live_status, &s.errors.auxiliary];
            let errors: Vec<String> = slots
                .into_iter()
                .flatten()
                .cloned()
                .collect();
            let status = match (s.data.is_some(), errors.is_empty()) {
                (true, true) => "healthy",
                (true, false) => "degraded",
                (false, _) => "unavailable",
            };
            Self {
                status,
                last_updated: s.last_updated,
                errors,
            }
        })
    }

    fn healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// GET /health
///
/// 200 while every store holds a dataset, 503 once any store has none.
pub async fn health_check(State(st): State<AppState>) -> impl IntoResponse {
    let energy = ComponentHealth::of(&st.energy);
    let climate = ComponentHealth::of(&st.climate);

    let available = energy.status != "unavailable" && climate.status != "unavailable";
    let status = match (energy.healthy() && climate.healthy(), available) {
        (true, _) => "healthy",
        (false, true) => "degraded",
        (false, false) => "unavailable",
    };
    let code = if available {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(HealthResponse {
            status,
            timestamp: Utc::now(),
            checks: HealthChecks { energy, climate },
        }),
    )
}

/// GET /healthz - liveness only
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
