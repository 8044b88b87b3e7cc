//! Error handling for the Farm Advisory server
//!
//! Malformed observation values are normalized by the engine and never reach
//! this module; only transport-level problems with the request body do.

use axum::{
    extract::{multipart::MultipartError, rejection::FormRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported content type: {0}")]
    UnsupportedMediaType(String),

    #[error("Malformed request body: {message}")]
    MalformedBody {
        field: Option<String>,
        message: String,
    },
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn malformed(message: impl Into<String>) -> Self {
        AppError::MalformedBody {
            field: None,
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                AppError::UnsupportedMediaType("expected application/json".to_string())
            }
            other => AppError::malformed(other.body_text()),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::malformed(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::malformed(err.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorDetail {
                    code: "UNSUPPORTED_MEDIA_TYPE".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::MalformedBody { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "MALFORMED_BODY".to_string(),
                    message: message.clone(),
                    field: field.clone(),
                },
            ),
        };

        tracing::warn!("Rejected request: {}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
