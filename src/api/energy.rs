use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use serde::Serialize;

use crate::{
    api::{
        domain::{self, DomainView, ViewResponse},
        error::ApiError,
        response::ApiResponse,
    },
    app::AppState,
    domain::{DistributionNode, NewNode, NodePatch},
    sync::Energy,
};

pub fn routes() -> Router<AppState> {
    domain::routes::<Energy>()
        .route("/optimize", post(optimize))
        .route("/nodes", post(add_node))
        .route("/nodes/:id", patch(update_node).delete(remove_node))
}

/// POST /api/v1/energy/optimize
pub async fn optimize(State(st): State<AppState>) -> ViewResponse<Energy> {
    st.energy.optimize()?;
    Ok(Json(ApiResponse::success(DomainView::of(&st.energy))))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCreated {
    pub id: String,
}

/// POST /api/v1/energy/nodes
pub async fn add_node(
    State(st): State<AppState>,
    Json(node): Json<NewNode>,
) -> Result<(StatusCode, Json<ApiResponse<NodeCreated>>), ApiError> {
    let id = st.energy.add_node(node)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(NodeCreated { id })),
    ))
}

/// PATCH /api/v1/energy/nodes/:id
pub async fn update_node(
    State(st): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<NodePatch>,
) -> Result<StatusCode, ApiError> {
    if st.energy.update_node(&id, patch)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("node '{id}'")))
    }
}

/// DELETE /api/v1/energy/nodes/:id
pub async fn remove_node(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DistributionNode>>, ApiError> {
    st.energy
        .remove_node(&id)?
        .map(|node| Json(ApiResponse::success(node)))
        .ok_or_else(|| ApiError::NotFound(format!("node '{id}'")))
}
