//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use userhub_core::error::{AppError, ErrorKind};

use crate::dto::response::ApiResponse;

/// HTTP-facing wrapper around the domain error.
///
/// Handlers return this so a `?` on any `AppResult` produces the
/// standard response envelope with the right status code.
#[derive(Debug, Clone)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Returns the HTTP status for the wrapped error.
    pub fn status_code(&self) -> StatusCode {
        match self.0.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Database
            | ErrorKind::Cache
            | ErrorKind::Serialization
            | ErrorKind::Configuration
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self(AppError::validation(errors.to_string()))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures keep their detail in the logs, not the body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "Internal server error");
            "internal server error".to_string()
        } else {
            self.0.message.clone()
        };

        let body = ApiResponse::<()>::error(status.as_u16(), message);
        (status, Json(body)).into_response()
    }
}
