//! S3-compatible blob storage for project assets.
//!
//! Images, generated videos and thumbnails are stored under per-user keys:
//! - `users/{uid}/images/{millis}_{file_name}`
//! - `users/{uid}/videos/{millis}.mp4`
//! - `users/{uid}/thumbnails/{millis}.jpg`

pub mod assets;
pub mod client;
pub mod error;

pub use assets::{image_key, sanitize_file_name, thumbnail_key, video_key, StoredAsset};
pub use client::{public_url, BlobClient, BlobConfig, DOWNLOAD_URL_TTL};
pub use error::{StorageError, StorageResult};
