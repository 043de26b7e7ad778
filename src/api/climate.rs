use axum::Router;

use crate::{api::domain, app::AppState, sync::Climate};

/// The climate store exposes only the shared domain routes.
pub fn routes() -> Router<AppState> {
    domain::routes::<Climate>()
}
