//! Cloudinary media store
//!
//! Signed upload of a base64 data URI through the REST upload API.
//! The signature is the hex SHA-256 of the sorted signed parameters
//! followed by the API secret.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{ImageUpload, MediaError, MediaStore};
use crate::config::CloudinaryConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Upload images to Cloudinary
pub struct CloudinaryStore {
    config: CloudinaryConfig,
    client: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            api_base: API_BASE.to_owned(),
        }
    }

    /// Point uploads at a different API root (for tests and proxies)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Sign `folder` and `timestamp`, the only signed upload parameters used
    pub fn sign(&self, timestamp: i64) -> String {
        let to_sign = format!(
            "folder={}&timestamp={}{}",
            self.config.folder, timestamp, self.config.api_secret
        );
        hex::encode(Sha256::digest(to_sign.as_bytes()))
    }
}

/// `data:<mime>;base64,<payload>`
pub fn data_uri(image: &ImageUpload) -> String {
    format!(
        "data:{};base64,{}",
        image.content_type_or_default(),
        STANDARD.encode(&image.bytes)
    )
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    fn name(&self) -> &'static str {
        "cloudinary"
    }

    async fn store(&self, image: &ImageUpload) -> Result<String, MediaError> {
        if image.bytes.is_empty() {
            return Err(MediaError::Empty);
        }

        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(timestamp);
        let timestamp = timestamp.to_string();
        let file = data_uri(image);

        let params = [
            ("file", file.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("folder", self.config.folder.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .client
            .post(self.upload_url())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        tracing::debug!(url = %uploaded.secure_url, "Uploaded image to Cloudinary");
        Ok(uploaded.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn store() -> CloudinaryStore {
        CloudinaryStore::new(CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "1234".into(),
            api_secret: "abcd".into(),
            folder: "schoolImages".into(),
        })
    }

    #[test]
    fn signature_is_sha256_of_sorted_params_and_secret() {
        let expected = hex::encode(Sha256::digest(
            b"folder=schoolImages&timestamp=1315060510abcd",
        ));
        let signature = store().sign(1315060510);
        assert_eq!(signature, expected);
        assert_eq!(signature.len(), 64);
    }

    #[test]
    fn data_uri_defaults_to_jpeg() {
        let image = ImageUpload {
            file_name: None,
            content_type: None,
            bytes: Bytes::from_static(b"hi"),
        };
        assert_eq!(data_uri(&image), "data:image/jpeg;base64,aGk=");
    }

    #[test]
    fn upload_url_uses_cloud_name() {
        let store = store().with_api_base("http://localhost:9/v1_1/");
        assert_eq!(store.upload_url(), "http://localhost:9/v1_1/demo/image/upload");
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let store = store().with_api_base("http://127.0.0.1:9");
        let image = ImageUpload {
            file_name: Some("a.png".into()),
            content_type: Some("image/png".into()),
            bytes: Bytes::from_static(b"png"),
        };
        let err = store.store(&image).await.unwrap_err();
        assert!(matches!(err, MediaError::Http(_)));
    }
}
