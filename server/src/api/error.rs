use crate::images::ImageHostError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::ErrorResponse;

/// Every handler failure funnels through this type so status codes and the
/// JSON error envelope stay consistent across the API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("File upload error: {0}")]
    Upload(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                "Validation error".to_string(),
                Some(details),
            ),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, message.to_string(), None)
            }
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message.to_string(), None),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string(), None),
            ApiError::Upload(details) => (
                StatusCode::BAD_REQUEST,
                "File upload error".to_string(),
                Some(details),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
        };
        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        tracing::error!("Database error: {}", err);
        ApiError::Internal
    }
}

impl From<diesel::r2d2::PoolError> for ApiError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        tracing::error!("Failed to get database connection: {}", err);
        ApiError::Internal
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON serialization error: {}", err);
        ApiError::Internal
    }
}

impl From<ImageHostError> for ApiError {
    fn from(err: ImageHostError) -> Self {
        tracing::error!("Image upload failed: {}", err);
        ApiError::Internal
    }
}
