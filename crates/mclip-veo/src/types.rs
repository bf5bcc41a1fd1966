//! Veo REST wire types.

use bytes::Bytes;
use mclip_models::{ClipDuration, VideoResolution};
use serde::{Deserialize, Serialize};

use crate::error::{VeoError, VeoResult};

/// Finish reason reported for a successful sample.
pub const FINISH_REASON_SUCCESS: &str = "SUCCESS";

// =============================================================================
// Requests
// =============================================================================

/// One image-to-video generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    pub prompt: String,
    /// Base64-encoded image bytes
    pub image_base64: String,
    pub mime_type: String,
    pub resolution: VideoResolution,
    pub duration: Option<ClipDuration>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest {
    pub instances: Vec<Instance>,
    pub parameters: Parameters,
}

#[derive(Debug, Serialize)]
pub(crate) struct Instance {
    pub prompt: String,
    pub image: InlineImage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineImage {
    pub bytes_base64_encoded: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Parameters {
    pub aspect_ratio: String,
    pub resolution: String,
    pub sample_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
}

impl PredictRequest {
    pub(crate) fn from_request(request: &VideoRequest, aspect_ratio: &str) -> Self {
        Self {
            instances: vec![Instance {
                prompt: request.prompt.clone(),
                image: InlineImage {
                    bytes_base64_encoded: request.image_base64.clone(),
                    mime_type: request.mime_type.clone(),
                },
            }],
            parameters: Parameters {
                aspect_ratio: aspect_ratio.to_string(),
                resolution: request.resolution.as_str().to_string(),
                sample_count: 1,
                duration_seconds: request.duration.map(|d| d.seconds()),
            },
        }
    }
}

// =============================================================================
// Long-running operation
// =============================================================================

/// A long-running generation operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Opaque handle, e.g. `models/veo/operations/abc123`
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<OperationResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_video_response: Option<GenerateVideoResponse>,
    /// Shape used by the SDK-style response
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generated_videos: Vec<GeneratedSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rai_media_filtered_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rai_media_filtered_reasons: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// RPC status attached to failed operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl Operation {
    fn first_sample(&self) -> Option<&GeneratedSample> {
        let response = self.response.as_ref()?;
        response
            .generate_video_response
            .as_ref()
            .and_then(|r| r.generated_samples.first())
            .or_else(|| response.generated_videos.first())
    }

    /// Extract the video URI from a finished operation.
    ///
    /// A present URI wins. Otherwise a non-success finish reason or a
    /// content filter reason yields `Blocked`, an operation error yields
    /// `GenerationFailed`, and anything else `NoVideo`.
    pub fn extract_video(&self) -> VeoResult<String> {
        let sample = self.first_sample();

        if let Some(uri) = sample
            .and_then(|s| s.video.as_ref())
            .and_then(|v| v.uri.as_deref())
            .filter(|u| !u.is_empty())
        {
            return Ok(uri.to_string());
        }

        if let Some(reason) = sample
            .and_then(|s| s.finish_reason.as_deref())
            .filter(|r| *r != FINISH_REASON_SUCCESS)
        {
            return Err(VeoError::Blocked(reason.to_string()));
        }

        if let Some(reason) = self
            .response
            .as_ref()
            .and_then(|r| r.generate_video_response.as_ref())
            .and_then(|r| r.rai_media_filtered_reasons.first())
        {
            return Err(VeoError::Blocked(reason.clone()));
        }

        let message = self
            .response
            .as_ref()
            .and_then(|r| r.error.as_ref())
            .or(self.error.as_ref())
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty());

        match message {
            Some(message) => Err(VeoError::GenerationFailed(message)),
            None => Err(VeoError::NoVideo),
        }
    }
}

/// A downloaded video.
#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    pub bytes: Bytes,
    pub uri: String,
    pub operation_name: String,
}
