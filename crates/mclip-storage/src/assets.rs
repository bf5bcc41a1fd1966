//! Object keys and upload helpers for project assets.

use std::path::Path;

use chrono::Utc;
use mclip_models::mime;

use crate::client::BlobClient;
use crate::error::{StorageError, StorageResult};

const FALLBACK_IMAGE_NAME: &str = "image.jpg";

/// An uploaded object and the URL it can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub key: String,
    pub url: String,
}

/// Final path component of `name`, with separators and control characters removed.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_IMAGE_NAME.to_string()
    } else {
        cleaned
    }
}

pub fn image_key(uid: &str, millis: i64, file_name: &str) -> String {
    format!("users/{}/images/{}_{}", uid, millis, sanitize_file_name(file_name))
}

pub fn video_key(uid: &str, millis: i64) -> String {
    format!("users/{}/videos/{}.mp4", uid, millis)
}

pub fn thumbnail_key(uid: &str, millis: i64) -> String {
    format!("users/{}/thumbnails/{}.jpg", uid, millis)
}

impl BlobClient {
    /// Upload the source image of a project.
    pub async fn upload_project_image(&self, uid: &str, path: &Path) -> StorageResult<StoredAsset> {
        let content_type = mclip_models::image_mime_type(path).ok_or_else(|| {
            StorageError::upload_failed(format!("unsupported image type: {}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(FALLBACK_IMAGE_NAME);

        let key = image_key(uid, Utc::now().timestamp_millis(), file_name);
        self.upload_file(path, &key, content_type).await?;
        self.stored(key).await
    }

    /// Upload a generated video.
    pub async fn upload_project_video(&self, uid: &str, path: &Path) -> StorageResult<StoredAsset> {
        let key = video_key(uid, Utc::now().timestamp_millis());
        self.upload_file(path, &key, mime::MP4).await?;
        self.stored(key).await
    }

    /// Upload a thumbnail frame of a generated video.
    pub async fn upload_project_thumbnail(
        &self,
        uid: &str,
        path: &Path,
    ) -> StorageResult<StoredAsset> {
        let key = thumbnail_key(uid, Utc::now().timestamp_millis());
        self.upload_file(path, &key, mime::JPEG).await?;
        self.stored(key).await
    }

    async fn stored(&self, key: String) -> StorageResult<StoredAsset> {
        let url = self.download_url(&key).await?;
        Ok(StoredAsset { key, url })
    }
}
