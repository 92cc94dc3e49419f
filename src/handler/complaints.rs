use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::complaintdtos::{ComplaintQueryDto, CreateComplaintDto, UpdateComplaintDto},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    service::authorization::{can, Action, EntityKind, Subject},
    AppState,
};

pub fn complaints_handler() -> Router {
    Router::new()
        .route("/", get(list_complaints).post(create_complaint))
        .route(
            "/:complaint_id",
            get(get_complaint).put(update_complaint).delete(delete_complaint),
        )
}

pub async fn list_complaints(
    Query(filters): Query<ComplaintQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    filters
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let actor = &auth.actor;
    let (complaints, pagination) = app_state.complaint_service.list(actor, &filters).await?;

    let can_create =
        can(actor, Action::Create, Subject::Kind(EntityKind::Complaint)).is_allowed();
    let can_assign = actor.role.is_staff_manager();

    Ok(Json(json!({
        "status": "success",
        "data": { "complaints": complaints },
        "pagination": pagination,
        "filters": {
            "search": filters.search,
            "status": filters.status,
            "priority": filters.priority,
        },
        "can_create": can_create,
        "can_assign": can_assign,
    })))
}

pub async fn create_complaint(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateComplaintDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let complaint = app_state.complaint_service.create(&auth.actor, &body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Complaint submitted successfully",
            "data": { "complaint": complaint }
        })),
    ))
}

pub async fn get_complaint(
    Path(complaint_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let detail = app_state
        .complaint_service
        .detail(&auth.actor, complaint_id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "data": detail,
    })))
}

pub async fn update_complaint(
    Path(complaint_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateComplaintDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let complaint = app_state
        .complaint_service
        .update(&auth.actor, complaint_id, &body)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Complaint updated successfully",
        "data": { "complaint": complaint }
    })))
}

pub async fn delete_complaint(
    Path(complaint_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .complaint_service
        .delete(&auth.actor, complaint_id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Complaint deleted successfully"
    })))
}
