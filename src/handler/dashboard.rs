use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Extension, Json, Router};
use serde_json::json;

use crate::{error::HttpError, middleware::JWTAuthMiddleware, AppState};

pub fn dashboard_handler() -> Router {
    Router::new().route("/", get(get_dashboard))
}

pub async fn get_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let dashboard = app_state.dashboard_service.dashboard(&auth.actor).await?;

    Ok(Json(json!({
        "status": "success",
        "data": dashboard,
    })))
}
