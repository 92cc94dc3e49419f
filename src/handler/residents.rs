use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::residentdtos::{ResidentQueryDto, SaveResidentDto},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    service::{
        authorization::{can, Action, EntityKind, Subject},
        resident_service::ResidentListing,
    },
    AppState,
};

pub fn residents_handler() -> Router {
    Router::new()
        .route("/", get(list_residents).post(create_resident))
        .route(
            "/:resident_id",
            get(get_resident).put(update_resident).delete(delete_resident),
        )
}

/// Residents are sent to their own record instead of the list.
pub async fn list_residents(
    Query(filters): Query<ResidentQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<Response, HttpError> {
    filters
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let actor = &auth.actor;
    let (residents, pagination) = match app_state.resident_service.list(actor, &filters).await? {
        ResidentListing::OwnRecord(resident_id) => {
            return Ok(Redirect::to(&format!("/api/residents/{}", resident_id)).into_response());
        }
        ResidentListing::Page(residents, pagination) => (residents, pagination),
    };

    let can_create =
        can(actor, Action::Create, Subject::Kind(EntityKind::Resident)).is_allowed();

    Ok(Json(json!({
        "status": "success",
        "data": { "residents": residents },
        "pagination": pagination,
        "filters": {
            "search": filters.search,
            "status": filters.status,
        },
        "can_create": can_create,
    }))
    .into_response())
}

pub async fn create_resident(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<SaveResidentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let resident = app_state.resident_service.create(&auth.actor, &body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Resident added successfully",
            "data": { "resident": resident }
        })),
    ))
}

pub async fn get_resident(
    Path(resident_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let detail = app_state
        .resident_service
        .detail(&auth.actor, resident_id)
        .await?;
    let can_edit =
        can(&auth.actor, Action::Update, Subject::Resident(&detail.resident)).is_allowed();

    Ok(Json(json!({
        "status": "success",
        "data": detail,
        "can_edit": can_edit,
    })))
}

pub async fn update_resident(
    Path(resident_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<SaveResidentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let resident = app_state
        .resident_service
        .update(&auth.actor, resident_id, &body)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Resident updated successfully",
        "data": { "resident": resident }
    })))
}

pub async fn delete_resident(
    Path(resident_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .resident_service
        .delete(&auth.actor, resident_id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Resident deleted successfully"
    })))
}
