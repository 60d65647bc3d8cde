use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use service::auth::AuthError;
use service::validation::FieldErrors;
use service::ServiceError;

pub const UNAUTHENTICATED: &str = "Unauthenticated.";
pub const SERVER_ERROR: &str = "Server Error";

/// Error returned by every handler; rendered as `{ "message": .. }` with
/// field errors added for validation failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("{1}")]
    Status(StatusCode, String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthenticated() -> Self { Self::Status(StatusCode::UNAUTHORIZED, UNAUTHENTICATED.into()) }

    pub fn not_found(message: impl Into<String>) -> Self { Self::Status(StatusCode::NOT_FOUND, message.into()) }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Status(StatusCode::UNPROCESSABLE_ENTITY, message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Status(status, _) => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(fields) => ApiError::Validation(fields),
            ServiceError::NotFound(message) => ApiError::not_found(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(fields) => ApiError::Validation(fields),
            AuthError::InvalidCredentials => ApiError::unprocessable(err.to_string()),
            AuthError::Unauthenticated => ApiError::unauthenticated(),
            other => ApiError::Internal(format!("auth error {}: {}", other.code(), other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(fields) => {
                let body = json!({ "message": fields.summary(), "errors": fields });
                (status, Json(body)).into_response()
            }
            ApiError::Status(_, message) => {
                if status == StatusCode::UNAUTHORIZED {
                    warn!(status = status.as_u16(), "request rejected: unauthenticated");
                }
                (status, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Internal(cause) => {
                error!(error = %cause, "request failed");
                (status, Json(json!({ "message": SERVER_ERROR }))).into_response()
            }
        }
    }
}
