//! School endpoints
//!
//! - `GET /schools`: list, newest first, never cached
//! - `POST /schools`: multipart registration
//! - `POST /schools/{id}/image`: replace a record's image

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::{SchoolIdPath, SchoolSubmission};
use crate::models::{School, SchoolId};
use crate::state::AppState;

/// Headers that keep clients and proxies from caching the list
const NO_CACHE: [(HeaderName, &str); 3] = [
    (
        header::CACHE_CONTROL,
        "no-store, no-cache, must-revalidate, proxy-revalidate",
    ),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

/// List response
#[derive(Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<School>,
}

/// Create response
#[derive(Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: SchoolId,
}

/// Image attach response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub success: bool,
    pub image_path: String,
}

/// GET /schools - list all schools
async fn list_schools(State(state): State<AppState>) -> impl IntoResponse {
    let result = state
        .service()
        .list()
        .await
        .map(|data| Json(ListResponse {
            success: true,
            data,
        }))
        .map_err(ApiError::store("DB error"));

    (NO_CACHE, result)
}

/// POST /schools - register a school
async fn create_school(
    State(state): State<AppState>,
    submission: SchoolSubmission,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = state
        .service()
        .create(submission.form, submission.image)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create school"))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { success: true, id })))
}

/// POST /schools/{id}/image - attach an image to a school
async fn attach_image(
    State(state): State<AppState>,
    SchoolIdPath(id): SchoolIdPath,
    submission: SchoolSubmission,
) -> Result<Json<ImageResponse>, ApiError> {
    let image = submission.image.ok_or(ApiError::MissingFile {
        message: "Image file is required",
    })?;

    let image_path = state
        .service()
        .attach_image(id, image)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to update image"))?;

    Ok(Json(ImageResponse {
        success: true,
        image_path,
    }))
}

async fn schools_method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed {
        method,
        allow: "GET, POST",
    }
}

async fn image_method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed {
        method,
        allow: "POST",
    }
}

/// School routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/schools",
            get(list_schools)
                .post(create_school)
                .fallback(schools_method_not_allowed),
        )
        .route(
            "/schools/{id}/image",
            post(attach_image).fallback(image_method_not_allowed),
        )
}
