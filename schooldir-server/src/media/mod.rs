//! Media attachment - image storage for school records
//!
//! A deployment uses exactly one [`MediaStore`]: Cloudinary or a local,
//! web-served directory. The store returns the reference saved in
//! `imagePath` (an absolute URL or `/<folder>/<file>`).

pub mod cloudinary;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::MediaConfig;

pub use cloudinary::CloudinaryStore;
pub use local::LocalDiskStore;

/// Media type assumed when the client doesn't declare one
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Media error type
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image is empty")]
    Empty,
}

/// An image file received with a request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-side file name, if any
    pub file_name: Option<String>,
    /// Declared media type, if any
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Destination for uploaded images
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Store the image and return the reference to persist
    async fn store(&self, image: &ImageUpload) -> Result<String, MediaError>;
}

/// Build the configured media store
pub fn from_config(config: MediaConfig) -> Arc<dyn MediaStore> {
    match config {
        MediaConfig::Cloudinary(cfg) => Arc::new(CloudinaryStore::new(cfg)),
        MediaConfig::Local { public_dir, folder } => {
            Arc::new(LocalDiskStore::new(public_dir, folder))
        }
    }
}
