//! S3-compatible blob client.

use std::path::Path;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Lifetime of presigned download URLs.
pub const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Configuration for the blob client.
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// S3 API endpoint
    pub endpoint_url: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    /// Region (usually "auto" for R2)
    pub region: String,
    /// Public origin serving the bucket; presigned URLs are used when unset
    pub public_base_url: Option<String>,
}

impl BlobConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let required = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| StorageError::config_error(format!("{} not set", name)))
        };

        Ok(Self {
            endpoint_url: required("STORAGE_ENDPOINT_URL")?,
            access_key_id: required("STORAGE_ACCESS_KEY_ID")?,
            secret_access_key: required("STORAGE_SECRET_ACCESS_KEY")?,
            bucket_name: required("STORAGE_BUCKET")?,
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "auto".to_string()),
            public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .map(|v| v.trim_end_matches('/').to_string()),
        })
    }
}

/// Blob storage client.
#[derive(Clone)]
pub struct BlobClient {
    client: Client,
    bucket: String,
    public_base_url: Option<String>,
}

impl BlobClient {
    pub async fn new(config: BlobConfig) -> StorageResult<Self> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "mclip-storage",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket_name,
            public_base_url: config.public_base_url,
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> StorageResult<Self> {
        Self::new(BlobConfig::from_env()?).await
    }

    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<()> {
        let path = path.as_ref();
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.put(body, key, content_type).await?;
        info!(key = %key, path = %path.display(), "Uploaded file");
        Ok(())
    }

    async fn put(&self, body: ByteStream, key: &str, content_type: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    pub async fn download_bytes(&self, key: &str) -> StorageResult<Vec<u8>> {
        debug!(key = %key, "Downloading object");

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    StorageError::not_found(key)
                } else {
                    StorageError::DownloadFailed(DisplayErrorContext(&service_error).to_string())
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(bytes)
    }

    pub async fn delete_object(&self, key: &str) -> StorageResult<()> {
        debug!(key = %key, "Deleting object");

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::delete_failed(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    /// Delete several objects in one request. Returns how many were requested.
    pub async fn delete_objects(&self, keys: &[String]) -> StorageResult<u32> {
        if keys.is_empty() {
            return Ok(0);
        }

        let objects = keys
            .iter()
            .map(|k| {
                ObjectIdentifier::builder()
                    .key(k)
                    .build()
                    .map_err(|e| StorageError::InvalidKey(e.to_string()))
            })
            .collect::<StorageResult<Vec<_>>>()?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(true)
            .build()
            .map_err(|e| StorageError::delete_failed(e.to_string()))?;

        self.client
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| StorageError::delete_failed(DisplayErrorContext(&e).to_string()))?;

        info!(count = keys.len(), "Deleted objects");
        Ok(keys.len() as u32)
    }

    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(StorageError::AwsSdk(DisplayErrorContext(&service_error).to_string()))
                }
            }
        }
    }

    /// Presigned GET URL. No request is made.
    pub async fn presign_get(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| StorageError::PresignFailed(DisplayErrorContext(&e).to_string()))?;

        Ok(presigned.uri().to_string())
    }

    /// URL a browser or player can fetch the object from.
    pub async fn download_url(&self, key: &str) -> StorageResult<String> {
        match &self.public_base_url {
            Some(base) => Ok(public_url(base, key)),
            None => self.presign_get(key, DOWNLOAD_URL_TTL).await,
        }
    }

    pub async fn check_connectivity(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| {
                StorageError::AwsSdk(format!(
                    "Storage connectivity check failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}

/// `{base}/{key}` with each key segment percent-encoded.
pub fn public_url(base: &str, key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/{}", base.trim_end_matches('/'), encoded.join("/"))
}

fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|s| s == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
