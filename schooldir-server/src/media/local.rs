//! Local disk media store
//!
//! Writes images below `<public_dir>/<folder>` and returns the path the
//! server exposes them under.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ImageUpload, MediaError, MediaStore};

/// Longest sanitized stem kept from a client file name
const MAX_STEM_LEN: usize = 64;

/// Store images in a web-served directory
#[derive(Debug, Clone)]
pub struct LocalDiskStore {
    public_dir: PathBuf,
    folder: String,
}

impl LocalDiskStore {
    pub fn new(public_dir: impl Into<PathBuf>, folder: impl Into<String>) -> Self {
        Self {
            public_dir: public_dir.into(),
            folder: folder.into(),
        }
    }

    /// Directory images are written to
    pub fn upload_dir(&self) -> PathBuf {
        self.public_dir.join(&self.folder)
    }
}

#[async_trait]
impl MediaStore for LocalDiskStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn store(&self, image: &ImageUpload) -> Result<String, MediaError> {
        if image.bytes.is_empty() {
            return Err(MediaError::Empty);
        }

        let dir = self.upload_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!(
            "{}-{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(image.file_name.as_deref(), image.content_type_or_default())
        );
        tokio::fs::write(dir.join(&file_name), &image.bytes).await?;

        tracing::debug!(dir = %dir.display(), file = %file_name, "Stored image locally");
        Ok(format!("/{}/{}", self.folder.trim_matches('/'), file_name))
    }
}

/// Reduce a client file name to `[A-Za-z0-9._-]`, keeping only its base
/// name. Falls back to `image.<ext>` with the extension implied by the
/// media type.
pub fn sanitize_file_name(original: Option<&str>, content_type: &str) -> String {
    let base = original
        .map(|name| name.rsplit(&['/', '\\'][..]).next().unwrap_or(name))
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        return format!("image.{}", extension_for(content_type));
    }

    match cleaned.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{}.{}", truncate(stem, MAX_STEM_LEN), truncate(ext, 8))
        }
        _ => truncate(cleaned, MAX_STEM_LEN).to_owned(),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    // ASCII only after sanitizing, so byte slicing is safe
    &s[..s.len().min(max)]
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/avif" => "avif",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload(name: Option<&str>, bytes: &'static [u8]) -> ImageUpload {
        ImageUpload {
            file_name: name.map(str::to_owned),
            content_type: Some("image/png".into()),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn sanitize_keeps_safe_names() {
        assert_eq!(sanitize_file_name(Some("campus-01.webp"), "image/webp"), "campus-01.webp");
    }

    #[test]
    fn sanitize_strips_directories_and_odd_chars() {
        assert_eq!(
            sanitize_file_name(Some("../../etc/pass wd.png"), "image/png"),
            "pass_wd.png"
        );
        assert_eq!(
            sanitize_file_name(Some("C:\\Users\\me\\front gate.jpg"), "image/jpeg"),
            "front_gate.jpg"
        );
    }

    #[test]
    fn sanitize_falls_back_to_media_type() {
        assert_eq!(sanitize_file_name(None, "image/png"), "image.png");
        assert_eq!(sanitize_file_name(Some("   "), "image/webp"), "image.webp");
        assert_eq!(sanitize_file_name(Some(".."), "application/octet-stream"), "image.jpg");
    }

    #[tokio::test]
    async fn writes_into_public_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(tmp.path(), "schoolImages");

        let path = store.store(&upload(Some("logo.png"), b"png-bytes")).await.unwrap();

        assert!(path.starts_with("/schoolImages/"));
        assert!(path.ends_with("-logo.png"));
        let on_disk = tmp.path().join(path.trim_start_matches('/'));
        assert_eq!(std::fs::read(on_disk).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn rejects_empty_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(tmp.path(), "schoolImages");

        let err = store.store(&upload(Some("x.png"), b"")).await.unwrap_err();
        assert!(matches!(err, MediaError::Empty));
    }

    #[tokio::test]
    async fn unwritable_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the public directory should be
        let blocker = tmp.path().join("public");
        std::fs::write(&blocker, b"not a dir").unwrap();
        let store = LocalDiskStore::new(&blocker, "schoolImages");

        let err = store.store(&upload(Some("x.png"), b"data")).await.unwrap_err();
        assert!(matches!(err, MediaError::Io(_)));
    }
}
