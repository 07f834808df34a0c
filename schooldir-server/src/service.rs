//! Record service - validation, uniqueness, media and persistence
//!
//! `create` runs, short-circuiting on the first failure:
//! validate → contact unique → email unique → media → insert.
//! The uniqueness checks and the insert are not atomic.

use std::sync::Arc;

use crate::db::{SchoolStore, StoreError};
use crate::media::{ImageUpload, MediaError, MediaStore};
use crate::models::{NewSchool, School, SchoolForm, SchoolId, ValidationError};

/// A field that must be unique already exists on another record
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Conflict {
    #[error("A school with this number already exists.")]
    Contact,

    #[error("A school with this email already exists.")]
    Email,
}

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conflict(#[from] Conflict),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

/// School record operations
#[derive(Clone)]
pub struct SchoolService {
    store: Arc<dyn SchoolStore>,
    media: Arc<dyn MediaStore>,
}

impl SchoolService {
    pub fn new(store: Arc<dyn SchoolStore>, media: Arc<dyn MediaStore>) -> Self {
        Self { store, media }
    }

    /// All schools, newest first. A table that doesn't exist yet lists as
    /// empty.
    pub async fn list(&self) -> Result<Vec<School>, StoreError> {
        match self.store.list().await {
            Err(err) if err.is_missing_table() => {
                tracing::debug!("schools table not created yet, listing nothing");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Validate and persist a new school, returning its id.
    ///
    /// A failed image upload doesn't fail the call; the record is stored
    /// without an image.
    pub async fn create(
        &self,
        form: SchoolForm,
        image: Option<ImageUpload>,
    ) -> Result<SchoolId, ServiceError> {
        let school = NewSchool::from_form(form)?;

        if absent_table_is_empty(self.store.contact_exists(school.contact()).await)? {
            return Err(Conflict::Contact.into());
        }
        if absent_table_is_empty(self.store.email_exists(school.email()).await)? {
            return Err(Conflict::Email.into());
        }

        let image_path = match image {
            Some(image) => self.attach_or_skip(&image).await,
            None => None,
        };

        let id = self.insert_with_schema(&school, image_path.as_deref()).await?;
        tracing::info!(id, name = school.name(), has_image = image_path.is_some(), "School created");
        Ok(id)
    }

    /// Store an image for an existing record and point the record at it.
    ///
    /// Whether `id` matches a row isn't checked.
    pub async fn attach_image(
        &self,
        id: SchoolId,
        image: ImageUpload,
    ) -> Result<String, ServiceError> {
        let image_path = self.media.store(&image).await?;
        let updated = self.store.set_image(id, &image_path).await?;
        tracing::info!(id, updated, image_path = %image_path, "School image updated");
        Ok(image_path)
    }

    /// Store an image without touching any record; returns its reference
    pub async fn upload_image(&self, image: &ImageUpload) -> Result<String, MediaError> {
        let reference = self.media.store(image).await?;
        tracing::info!(media = self.media.name(), reference = %reference, "Image uploaded");
        Ok(reference)
    }

    /// Create the table up front
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.store.ensure_schema().await
    }

    async fn attach_or_skip(&self, image: &ImageUpload) -> Option<String> {
        match self.media.store(image).await {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!(
                    media = self.media.name(),
                    error = %err,
                    "Image upload failed, storing school without image"
                );
                None
            }
        }
    }

    /// Insert, creating the table and retrying once if it is missing
    async fn insert_with_schema(
        &self,
        school: &NewSchool,
        image_path: Option<&str>,
    ) -> Result<SchoolId, StoreError> {
        match self.store.insert(school, image_path).await {
            Err(err) if err.is_missing_table() => {
                tracing::warn!("schools table missing, creating it and retrying insert");
                self.store.ensure_schema().await?;
                self.store.insert(school, image_path).await
            }
            other => other,
        }
    }
}

/// A lookup against a table that doesn't exist finds nothing
fn absent_table_is_empty(result: Result<bool, StoreError>) -> Result<bool, StoreError> {
    match result {
        Err(err) if err.is_missing_table() => Ok(false),
        other => other,
    }
}
