//! Veo REST client.
//!
//! Submits image-to-video jobs through `predictLongRunning`, polls the
//! returned operation and downloads the finished clip.

use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, info, info_span, Instrument};
use url::Url;

use crate::config::VeoConfig;
use crate::error::{VeoError, VeoResult};
use crate::metrics;
use crate::poller::{JobPoller, OperationSource};
use crate::types::{GeneratedVideo, Operation, PredictRequest, VideoRequest};

/// Gemini Veo API client.
#[derive(Clone)]
pub struct VeoClient {
    http: Client,
    config: VeoConfig,
}

impl VeoClient {
    pub fn new(config: VeoConfig) -> VeoResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(VeoError::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("mclip-veo/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> VeoResult<Self> {
        Self::new(VeoConfig::from_env()?)
    }

    pub fn config(&self) -> &VeoConfig {
        &self.config
    }

    /// Start a generation job and return its operation handle.
    pub async fn submit(&self, request: &VideoRequest) -> VeoResult<Operation> {
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.config.base_url, self.config.model
        );
        let body = PredictRequest::from_request(request, &self.config.aspect_ratio);

        let span = info_span!("veo_submit", model = %self.config.model, resolution = %request.resolution);
        async {
            let response = self
                .http
                .post(&url)
                .query(&[("key", self.config.api_key.as_str())])
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            metrics::record_request("submit", status.as_u16());
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(VeoError::from_api_response(status.as_u16(), &text));
            }

            let operation: Operation = response.json().await?;
            if operation.name.is_empty() {
                return Err(VeoError::invalid_response("operation has no name"));
            }
            info!(operation = %operation.name, "Submitted video generation");
            Ok(operation)
        }
        .instrument(span)
        .await
    }

    /// Fetch the current state of an operation.
    pub async fn get_operation(&self, name: &str) -> VeoResult<Operation> {
        let url = format!("{}/{}", self.config.base_url, name.trim_start_matches('/'));

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        metrics::record_request("get_operation", status.as_u16());
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(VeoError::from_api_response(status.as_u16(), &text));
        }

        Ok(response.json().await?)
    }

    /// Download a generated video. The API key is appended to the URI.
    pub async fn download_video(&self, uri: &str) -> VeoResult<Bytes> {
        let mut url = Url::parse(uri)
            .map_err(|e| VeoError::invalid_response(format!("bad video uri {}: {}", uri, e)))?;
        url.query_pairs_mut().append_pair("key", &self.config.api_key);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        metrics::record_request("download", status.as_u16());
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %text, "Video download failed");
            return Err(VeoError::DownloadFailed {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        info!(size_bytes = bytes.len(), "Downloaded generated video");
        Ok(bytes)
    }

    /// Submit, wait for completion, then download the clip.
    pub async fn generate(&self, request: &VideoRequest) -> VeoResult<GeneratedVideo> {
        let started = Instant::now();
        let result = self.generate_inner(request).await;
        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::record_generation(started.elapsed().as_secs_f64(), outcome);
        result
    }

    async fn generate_inner(&self, request: &VideoRequest) -> VeoResult<GeneratedVideo> {
        let operation = self.submit(request).await?;
        let operation_name = operation.name.clone();

        let finished = JobPoller::from_config(&self.config)
            .poll_until_done(self, operation)
            .await?;

        let uri = finished.extract_video()?;
        let bytes = self.download_video(&uri).await?;

        Ok(GeneratedVideo {
            bytes,
            uri,
            operation_name,
        })
    }
}

#[async_trait]
impl OperationSource for VeoClient {
    async fn get_operation(&self, name: &str) -> VeoResult<Operation> {
        VeoClient::get_operation(self, name).await
    }
}
