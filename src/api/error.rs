use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{CalibrationError, ValidationError};

const ENABLE_LOGS: bool = true;

/// Details of internal failures stay in the log.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

use crate::log_error;

/// Error returned by every handler. The body is always `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<CalibrationError> for ApiError {
    fn from(err: CalibrationError) -> Self {
        match err {
            CalibrationError::Invalid(err) => err.into(),
            CalibrationError::Fit(err) => ApiError::BadRequest(err.to_string()),
            err @ CalibrationError::RoomConflict { .. } => ApiError::Conflict(err.to_string()),
            CalibrationError::Store(err) => ApiError::Internal(err),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(err) => {
                log_error!("request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
