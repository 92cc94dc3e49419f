use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    AuthorizationDenied(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        ServiceError::NotFound { entity, id }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::AuthorizationDenied(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::ConsistencyViolation(_) | ServiceError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::AuthorizationDenied(_) => {
                tracing::warn!("Request denied: {}", error);
                HttpError::forbidden(error.to_string())
            }

            ServiceError::NotFound { .. } => HttpError::not_found(error.to_string()),

            ServiceError::Conflict(_) | ServiceError::Validation(_) => {
                HttpError::new(error.to_string(), error.status_code())
            }

            ServiceError::ConsistencyViolation(_) | ServiceError::Database(_) => {
                tracing::error!("{}", error);
                HttpError::server_error("Something went wrong, please try again later")
            }
        }
    }
}

/// True when the database rejected a write on a unique index.
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db_error| db_error.is_unique_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_maps_to_forbidden_with_reason() {
        let error =
            ServiceError::AuthorizationDenied("You can only view your own house.".to_string());
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);

        let http: HttpError = error.into();
        assert_eq!(http.status, StatusCode::FORBIDDEN);
        assert_eq!(http.message, "You can only view your own house.");
    }

    #[test]
    fn not_found_is_distinct_from_denial() {
        let id = Uuid::new_v4();
        let http: HttpError = ServiceError::not_found("House", id).into();
        assert_eq!(http.status, StatusCode::NOT_FOUND);
        assert_eq!(http.message, format!("House {} not found", id));
    }

    #[test]
    fn consistency_violation_hides_details() {
        let http: HttpError =
            ServiceError::ConsistencyViolation("house vanished".to_string()).into();
        assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!http.message.contains("house vanished"));
    }

    #[test]
    fn conflict_and_validation_codes() {
        assert_eq!(
            ServiceError::Conflict("taken".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
