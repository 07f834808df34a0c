//! Custom Axum extractors

use axum::extract::multipart::Field;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Path, Request};
use axum::http::request::Parts;

use super::error::{ApiError, UploadError};
use crate::media::ImageUpload;
use crate::models::{SchoolForm, SchoolId, ValidationError};

/// Name of the multipart file part carrying the image
pub const IMAGE_FIELD: &str = "image";

/// Name of the file part on the standalone upload endpoint
pub const UPLOAD_FIELD: &str = "file";

/// Largest accepted image
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Extract and validate a school id from path
pub struct SchoolIdPath(pub SchoolId);

impl<S> FromRequestParts<S> for SchoolIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Missing { field: "id" }))?;

        let id = id.parse::<SchoolId>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "id must be an integer",
            })
        })?;

        Ok(Self(id))
    }
}

/// Multipart registration body: text fields plus an optional image.
///
/// Unknown fields are ignored and a zero-byte image counts as no image,
/// which is what browsers send when no file was chosen.
#[derive(Debug)]
pub struct SchoolSubmission {
    pub form: SchoolForm,
    pub image: Option<ImageUpload>,
}

impl<S> FromRequest<S> for SchoolSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(ApiError::parse)?;

        let mut form = SchoolForm::default();
        let mut image = None;

        while let Some(field) = multipart.next_field().await.map_err(ApiError::parse)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name != IMAGE_FIELD {
                let value = field.text().await.map_err(ApiError::parse)?;
                if !form.set(&name, value) {
                    tracing::debug!(field = %name, "Ignoring unknown form field");
                }
                continue;
            }

            if let Some(upload) = read_image(field).await.map_err(ApiError::parse)? {
                image = Some(upload);
            }
        }

        Ok(Self { form, image })
    }
}

/// Multipart body of the standalone upload endpoint: one `file` part
#[derive(Debug)]
pub struct UploadedFile(pub Option<ImageUpload>);

impl<S> FromRequest<S> for UploadedFile
where
    S: Send + Sync,
{
    type Rejection = UploadError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(UploadError::new)?;

        let mut file = None;
        while let Some(field) = multipart.next_field().await.map_err(UploadError::new)? {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }
            if let Some(upload) = read_image(field).await.map_err(UploadError::new)? {
                file = Some(upload);
            }
        }

        Ok(Self(file))
    }
}

/// Read a file part; a zero-byte part counts as no file
async fn read_image(field: Field<'_>) -> Result<Option<ImageUpload>, String> {
    let file_name = field.file_name().map(str::to_owned);
    let content_type = field.content_type().map(str::to_owned);
    let bytes = field.bytes().await.map_err(|err| err.to_string())?;

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(format!("image exceeds the {} byte limit", MAX_IMAGE_BYTES));
    }
    if bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(ImageUpload {
        file_name,
        content_type,
        bytes,
    }))
}
