//! Routes shared by every domain store.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::{
    api::{error::ApiError, response::ApiResponse},
    app::AppState,
    domain::{ClimateRegion, Coordinates, RegionMetrics},
    metrics::{ClimateMetrics, EnergyMetrics},
    service::ExportFormat,
    sync::{
        Climate, Domain, DomainSnapshot, DomainStore, Energy, RefreshPolicy, TimeRange,
        TimerName,
    },
};

/// Binds a domain to its store in [`AppState`] and to its derived views.
pub trait DomainApi: Domain {
    type Metrics: Serialize + Send;
    type RegionView: Serialize + Send;

    fn store(state: &AppState) -> &DomainStore<Self>;
    fn metrics(store: &DomainStore<Self>) -> Self::Metrics;
    fn region(store: &DomainStore<Self>, id: &str) -> Option<Self::RegionView>;
}

impl DomainApi for Energy {
    type Metrics = EnergyMetrics;
    type RegionView = RegionMetrics;

    fn store(state: &AppState) -> &DomainStore<Self> {
        &state.energy
    }

    fn metrics(store: &DomainStore<Self>) -> EnergyMetrics {
        store.metrics()
    }

    fn region(store: &DomainStore<Self>, id: &str) -> Option<RegionMetrics> {
        store.get_region_metrics(id)
    }
}

impl DomainApi for Climate {
    type Metrics = ClimateMetrics;
    type RegionView = ClimateRegion;

    fn store(state: &AppState) -> &DomainStore<Self> {
        &state.climate
    }

    fn metrics(store: &DomainStore<Self>) -> ClimateMetrics {
        store.metrics()
    }

    fn region(store: &DomainStore<Self>, id: &str) -> Option<ClimateRegion> {
        store.get_region_metrics(id)
    }
}

/// Snapshot plus everything derived from it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase", bound(serialize = ""))]
pub struct DomainView<D: DomainApi> {
    #[serde(flatten)]
    pub snapshot: DomainSnapshot<D>,
    pub metrics: D::Metrics,
    pub refresh_policy: RefreshPolicy,
    pub active_timers: Vec<TimerName>,
}

impl<D: DomainApi> DomainView<D> {
    pub fn of(store: &DomainStore<D>) -> Self {
        Self {
            snapshot: store.snapshot(),
            metrics: D::metrics(store),
            refresh_policy: store.refresh_policy(),
            active_timers: store.active_timers(),
        }
    }
}

pub type ViewResponse<D> = Result<Json<ApiResponse<DomainView<D>>>, ApiError>;

fn view<D: DomainApi>(st: &AppState) -> ViewResponse<D> {
    Ok(Json(ApiResponse::success(DomainView::of(D::store(st)))))
}

pub fn routes<D: DomainApi>() -> Router<AppState>
where
    D::Patch: DeserializeOwned,
{
    Router::new()
        .route("/", get(get_view::<D>))
        .route("/refresh", post(refresh::<D>))
        .route("/live-status/refresh", post(refresh_live_status::<D>))
        .route("/weather/refresh", post(refresh_weather::<D>))
        .route("/region", put(select_region::<D>))
        .route("/time-range", put(set_time_range::<D>))
        .route("/data", patch(update_data::<D>))
        .route("/regions/:id", get(region_metrics::<D>))
        .route("/refresh-policy", get(get_policy::<D>).put(update_policy::<D>))
        .route("/errors", delete(clear_errors::<D>))
        .route("/export", get(export::<D>))
}

pub async fn get_view<D: DomainApi>(State(st): State<AppState>) -> ViewResponse<D> {
    view(&st)
}

pub async fn refresh<D: DomainApi>(State(st): State<AppState>) -> ViewResponse<D> {
    D::store(&st).refresh().await;
    view(&st)
}

pub async fn refresh_live_status<D: DomainApi>(State(st): State<AppState>) -> ViewResponse<D> {
    D::store(&st).load_live_status().await;
    view(&st)
}

#[derive(Debug, Default, Deserialize)]
pub struct WeatherRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Without both coordinates the selected region (or default location) is used.
pub async fn refresh_weather<D: DomainApi>(
    State(st): State<AppState>,
    body: Option<Json<WeatherRequest>>,
) -> ViewResponse<D> {
    let store = D::store(&st);
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let coordinates = match (req.latitude, req.longitude) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon)?,
        _ => store.weather_coordinates(),
    };
    store.load_weather(coordinates).await;
    view(&st)
}

#[derive(Debug, Deserialize)]
pub struct SelectRegionRequest {
    pub region: Option<String>,
}

pub async fn select_region<D: DomainApi>(
    State(st): State<AppState>,
    Json(req): Json<SelectRegionRequest>,
) -> ViewResponse<D> {
    D::store(&st).set_selected_region(req.region).await;
    view(&st)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeRequest {
    pub time_range: TimeRange,
}

pub async fn set_time_range<D: DomainApi>(
    State(st): State<AppState>,
    Json(req): Json<TimeRangeRequest>,
) -> ViewResponse<D> {
    D::store(&st).set_time_range(req.time_range);
    view(&st)
}

pub async fn update_data<D: DomainApi>(
    State(st): State<AppState>,
    Json(patch): Json<D::Patch>,
) -> ViewResponse<D>
where
    D::Patch: DeserializeOwned,
{
    D::store(&st).update(patch)?;
    view(&st)
}

pub async fn region_metrics<D: DomainApi>(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<D::RegionView>>, ApiError> {
    D::region(D::store(&st), &id)
        .map(|r| Json(ApiResponse::success(r)))
        .ok_or_else(|| ApiError::NotFound(format!("{} region '{}'", D::NAME, id)))
}

pub async fn get_policy<D: DomainApi>(State(st): State<AppState>) -> Json<RefreshPolicy> {
    Json(D::store(&st).refresh_policy())
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPolicyUpdate {
    pub auto_refresh: Option<bool>,
    #[validate(range(min = 100))]
    pub refresh_interval_ms: Option<u64>,
    pub real_time_monitoring: Option<bool>,
    #[validate(range(min = 100))]
    pub real_time_interval_ms: Option<u64>,
}

/// All fields are applied together. Only timers whose settings changed are restarted.
pub async fn update_policy<D: DomainApi>(
    State(st): State<AppState>,
    Json(req): Json<RefreshPolicyUpdate>,
) -> Result<Json<RefreshPolicy>, ApiError> {
    req.validate()?;
    let policy = D::store(&st).update_refresh_policy(|p| {
        if let Some(ms) = req.refresh_interval_ms {
            p.refresh_interval = Duration::from_millis(ms);
        }
        if let Some(enabled) = req.auto_refresh {
            p.auto_refresh = enabled;
        }
        if let Some(ms) = req.real_time_interval_ms {
            p.real_time_interval = Duration::from_millis(ms);
        }
        if let Some(enabled) = req.real_time_monitoring {
            p.real_time_monitoring = enabled;
        }
    });
    Ok(Json(policy))
}

pub async fn clear_errors<D: DomainApi>(State(st): State<AppState>) -> StatusCode {
    D::store(&st).clear_error();
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<ExportFormat>,
}

pub async fn export<D: DomainApi>(
    State(st): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format = query.format.unwrap_or(ExportFormat::Json);
    let bytes = D::store(&st).export_snapshot(format).await?;
    let filename = format!(
        "{}-export-{}.{}",
        D::NAME,
        Utc::now().format("%Y%m%dT%H%M%SZ"),
        format.extension()
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
