use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use chrono::Utc;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler, complaints::complaints_handler, dashboard::dashboard_handler,
        houses::houses_handler, payments::payments_handler, residents::residents_handler,
        users::users_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest("/dashboard", dashboard_handler().layer(middleware::from_fn(auth)))
        .nest("/houses", houses_handler().layer(middleware::from_fn(auth)))
        .nest("/residents", residents_handler().layer(middleware::from_fn(auth)))
        .nest("/payments", payments_handler().layer(middleware::from_fn(auth)))
        .nest("/complaints", complaints_handler().layer(middleware::from_fn(auth)))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
