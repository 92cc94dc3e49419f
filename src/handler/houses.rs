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
    dtos::housedtos::{HouseQueryDto, SaveHouseDto},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    service::authorization::{can, Action, EntityKind, Subject},
    AppState,
};

pub fn houses_handler() -> Router {
    Router::new()
        .route("/", get(list_houses).post(create_house))
        .route(
            "/:house_id",
            get(get_house).put(update_house).delete(delete_house),
        )
}

pub async fn list_houses(
    Query(filters): Query<HouseQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    filters
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let actor = &auth.actor;
    let (houses, pagination) = app_state.house_service.list(actor, &filters).await?;

    let can_create = can(actor, Action::Create, Subject::Kind(EntityKind::House)).is_allowed();
    let can_edit = houses
        .iter()
        .any(|house| can(actor, Action::Update, Subject::House(house)).is_allowed());

    Ok(Json(json!({
        "status": "success",
        "data": { "houses": houses },
        "pagination": pagination,
        "filters": {
            "search": filters.search,
            "status": filters.status,
            "type": filters.house_type,
        },
        "can_create": can_create,
        "can_edit": can_edit,
    })))
}

pub async fn create_house(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<SaveHouseDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let house = app_state.house_service.create(&auth.actor, &body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "House added successfully",
            "data": { "house": house }
        })),
    ))
}

pub async fn get_house(
    Path(house_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let detail = app_state.house_service.detail(&auth.actor, house_id).await?;
    let can_edit = can(&auth.actor, Action::Update, Subject::House(&detail.house)).is_allowed();

    Ok(Json(json!({
        "status": "success",
        "data": detail,
        "can_edit": can_edit,
    })))
}

pub async fn update_house(
    Path(house_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<SaveHouseDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let house = app_state
        .house_service
        .update(&auth.actor, house_id, &body)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "House updated successfully",
        "data": { "house": house }
    })))
}

pub async fn delete_house(
    Path(house_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.house_service.delete(&auth.actor, house_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "House deleted successfully"
    })))
}
