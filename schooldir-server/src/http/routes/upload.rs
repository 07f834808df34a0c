//! Standalone image upload
//!
//! `POST /upload` stores a multipart `file` part with the configured media
//! store and returns its reference. No school record is touched.

use axum::{
    extract::State,
    http::Method,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::http::error::{ApiError, UploadError};
use crate::http::extractors::UploadedFile;
use crate::state::AppState;

/// Upload response
#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /upload - store an image
async fn upload_image(
    State(state): State<AppState>,
    UploadedFile(file): UploadedFile,
) -> Result<Json<UploadResponse>, UploadError> {
    let file = file.ok_or_else(|| UploadError::new("No file uploaded"))?;

    let url = state
        .service()
        .upload_image(&file)
        .await
        .map_err(UploadError::new)?;

    Ok(Json(UploadResponse { url }))
}

async fn upload_method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed {
        method,
        allow: "POST",
    }
}

/// Upload routes
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/upload",
        post(upload_image).fallback(upload_method_not_allowed),
    )
}
