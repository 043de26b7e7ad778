use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{error::ApiError, response::ApiResponse},
    app::AppState,
    scene::{
        CameraConfig, CameraPreset, LightingConfig, LightingPreset, OrbitControls, QualityPreset,
        RenderQuality, SceneConfig, SceneObject,
    },
};

type SceneResponse = Json<ApiResponse<SceneConfig>>;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_scene))
        .route("/presets/quality/:preset", put(quality_preset))
        .route("/presets/camera/:preset", put(camera_preset))
        .route("/presets/lighting/:preset", put(lighting_preset))
        .route("/camera", put(set_camera))
        .route("/lighting", put(set_lighting))
        .route("/orbit-controls", put(set_orbit_controls))
        .route("/render-quality", put(set_render_quality))
        .route("/visibility/:object", put(set_visibility))
        .route("/visibility/:object/toggle", post(toggle_visibility))
        .route("/animation-speed", put(set_animation_speed))
        .route("/export", get(export_scene))
        .route("/import", post(import_scene))
        .route("/reset", post(reset_scene))
}

fn current(st: &AppState) -> SceneResponse {
    Json(ApiResponse::success(st.scene.config()))
}

pub async fn get_scene(State(st): State<AppState>) -> SceneResponse {
    current(&st)
}

pub async fn quality_preset(
    State(st): State<AppState>,
    Path(preset): Path<QualityPreset>,
) -> SceneResponse {
    st.scene.apply_quality_preset(preset);
    current(&st)
}

pub async fn camera_preset(
    State(st): State<AppState>,
    Path(preset): Path<CameraPreset>,
) -> SceneResponse {
    st.scene.apply_camera_preset(preset);
    current(&st)
}

pub async fn lighting_preset(
    State(st): State<AppState>,
    Path(preset): Path<LightingPreset>,
) -> SceneResponse {
    st.scene.apply_lighting_preset(preset);
    current(&st)
}

pub async fn set_camera(
    State(st): State<AppState>,
    Json(camera): Json<CameraConfig>,
) -> SceneResponse {
    st.scene.set_camera(camera);
    current(&st)
}

pub async fn set_lighting(
    State(st): State<AppState>,
    Json(lighting): Json<LightingConfig>,
) -> SceneResponse {
    st.scene.set_lighting(lighting);
    current(&st)
}

pub async fn set_orbit_controls(
    State(st): State<AppState>,
    Json(controls): Json<OrbitControls>,
) -> SceneResponse {
    st.scene.set_orbit_controls(controls);
    current(&st)
}

pub async fn set_render_quality(
    State(st): State<AppState>,
    Json(quality): Json<RenderQuality>,
) -> SceneResponse {
    st.scene.set_render_quality(quality);
    current(&st)
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

pub async fn set_visibility(
    State(st): State<AppState>,
    Path(object): Path<SceneObject>,
    Json(req): Json<VisibilityRequest>,
) -> SceneResponse {
    st.scene.set_object_visibility(object, req.visible);
    current(&st)
}

#[derive(Debug, Serialize)]
pub struct VisibilityToggled {
    pub object: SceneObject,
    pub visible: bool,
}

pub async fn toggle_visibility(
    State(st): State<AppState>,
    Path(object): Path<SceneObject>,
) -> Json<ApiResponse<VisibilityToggled>> {
    let visible = st.scene.toggle_object(object);
    Json(ApiResponse::success(VisibilityToggled { object, visible }))
}

#[derive(Debug, Deserialize)]
pub struct AnimationSpeedRequest {
    pub speed: f64,
}

pub async fn set_animation_speed(
    State(st): State<AppState>,
    Json(req): Json<AnimationSpeedRequest>,
) -> SceneResponse {
    st.scene.set_animation_speed(req.speed);
    current(&st)
}

pub async fn export_scene(State(st): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = st.scene.export_config()?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"scene-config.json\"",
            ),
        ],
        body,
    ))
}

/// Accepts the raw text of a previous export; partial documents are allowed.
pub async fn import_scene(
    State(st): State<AppState>,
    body: String,
) -> Result<SceneResponse, ApiError> {
    st.scene.import_config(&body)?;
    Ok(current(&st))
}

pub async fn reset_scene(State(st): State<AppState>) -> StatusCode {
    st.scene.reset();
    StatusCode::NO_CONTENT
}
