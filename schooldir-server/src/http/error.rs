//! API error types with IntoResponse
//!
//! Every failure becomes a `{success: false, message, error?}` body with
//! the matching status code.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::StoreError;
use crate::models::ValidationError;
use crate::service::{Conflict, ServiceError};

/// Error envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed field (400)
    Validation(ValidationError),

    /// Duplicate contact or email (400)
    Conflict(Conflict),

    /// Required file part absent (400)
    MissingFile { message: &'static str },

    /// Store or media failure (500, logged)
    Internal { message: &'static str, error: String },

    /// Unreadable request body (500, logged)
    Parse { error: String },

    /// Method not served on this path (405)
    MethodNotAllowed { method: Method, allow: &'static str },
}

impl ApiError {
    /// Map a service failure, using `message` for internal errors
    pub fn from_service(err: ServiceError, message: &'static str) -> Self {
        match err {
            ServiceError::Validation(e) => Self::Validation(e),
            ServiceError::Conflict(c) => Self::Conflict(c),
            ServiceError::Store(e) => Self::internal(message, e),
            ServiceError::Media(e) => Self::internal(message, e),
        }
    }

    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |err| Self::internal(message, err)
    }

    pub fn internal(message: &'static str, error: impl ToString) -> Self {
        Self::Internal {
            message,
            error: error.to_string(),
        }
    }

    pub fn parse(error: impl ToString) -> Self {
        Self::Parse {
            error: error.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::MissingFile { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal { .. } | Self::Parse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, error) = match &self {
            Self::Validation(e) => (e.to_string(), None),
            Self::Conflict(c) => (c.to_string(), None),
            Self::MissingFile { message } => ((*message).to_owned(), None),
            Self::Internal { message, error } => {
                tracing::error!("{}: {}", message, error);
                ((*message).to_owned(), Some(error.clone()))
            }
            Self::Parse { error } => {
                tracing::error!("Failed to parse form: {}", error);
                ("Failed to parse form".to_owned(), Some(error.clone()))
            }
            Self::MethodNotAllowed { method, .. } => {
                (format!("Method {} Not Allowed", method), None)
            }
        };

        let body = Json(ErrorBody {
            success: false,
            message,
            error,
        });
        let mut response = (status, body).into_response();

        if let Self::MethodNotAllowed { allow, .. } = &self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(*allow));
        }

        response
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

/// Failure envelope of the standalone upload endpoint
#[derive(Debug, Serialize)]
pub struct UploadErrorBody {
    pub error: &'static str,
    pub details: String,
}

/// Upload endpoint failure (always 500)
#[derive(Debug)]
pub struct UploadError {
    pub details: String,
}

impl UploadError {
    pub fn new(details: impl ToString) -> Self {
        Self {
            details: details.to_string(),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        tracing::error!("Image upload failed: {}", self.details);
        let body = Json(UploadErrorBody {
            error: "Image upload failed",
            details: self.details,
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
