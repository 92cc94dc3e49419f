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
    dtos::paymentdtos::{PaymentQueryDto, SavePaymentDto},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    service::authorization::{can, Action, EntityKind, Subject},
    AppState,
};

pub fn payments_handler() -> Router {
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route(
            "/:payment_id",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
}

pub async fn list_payments(
    Query(filters): Query<PaymentQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    filters
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let actor = &auth.actor;
    let (payments, pagination) = app_state.payment_service.list(actor, &filters).await?;

    let can_create = can(actor, Action::Create, Subject::Kind(EntityKind::Payment)).is_allowed();

    Ok(Json(json!({
        "status": "success",
        "data": { "payments": payments },
        "pagination": pagination,
        "filters": {
            "search": filters.search,
            "status": filters.status,
            "type": filters.payment_type,
        },
        "can_create": can_create,
    })))
}

pub async fn create_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<SavePaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let payment = app_state.payment_service.create(&auth.actor, &body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Payment recorded successfully",
            "data": { "payment": payment }
        })),
    ))
}

pub async fn get_payment(
    Path(payment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state.payment_service.get(&auth.actor, payment_id).await?;
    let can_edit = can(&auth.actor, Action::Update, Subject::Payment(&payment)).is_allowed();

    Ok(Json(json!({
        "status": "success",
        "data": { "payment": payment },
        "can_edit": can_edit,
    })))
}

pub async fn update_payment(
    Path(payment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<SavePaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let payment = app_state
        .payment_service
        .update(&auth.actor, payment_id, &body)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Payment updated successfully",
        "data": { "payment": payment }
    })))
}

pub async fn delete_payment(
    Path(payment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.payment_service.delete(&auth.actor, payment_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Payment deleted successfully"
    })))
}
