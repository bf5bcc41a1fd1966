//! Veo client error types.

use std::time::Duration;

use thiserror::Error;

/// Result type for Veo operations.
pub type VeoResult<T> = Result<T, VeoError>;

/// Errors that can occur while generating a video.
#[derive(Debug, Error)]
pub enum VeoError {
    #[error("API key not found. Please select your API Key.")]
    MissingApiKey,

    #[error("The selected API key is not valid. Please select a valid key and try again.")]
    InvalidApiKey,

    #[error("API Key not found. Please select your API Key again.")]
    ApiKeyNotFound,

    #[error("Veo API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to get video generation status.")]
    PollFailed(#[source] Box<VeoError>),

    #[error("Video generation did not finish within {}s", .0.as_secs())]
    PollTimeout(Duration),

    #[error("{0}")]
    GenerationFailed(String),

    #[error("Video generation blocked: {0}. Try a different prompt or image.")]
    Blocked(String),

    #[error("Video generation completed, but no video URL was returned.")]
    NoVideo,

    #[error("Failed to download the generated video. Status: {status}")]
    DownloadFailed { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VeoError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map an unsuccessful API response to an error, recognising key problems.
    pub fn from_api_response(status: u16, body: &str) -> Self {
        if body.contains("API key not valid") {
            Self::InvalidApiKey
        } else if body.contains("Requested entity was not found.") {
            Self::ApiKeyNotFound
        } else {
            Self::Api {
                status,
                message: body.to_string(),
            }
        }
    }

    /// True when the user has to pick a different API key before retrying.
    pub fn requires_new_key(&self) -> bool {
        match self {
            VeoError::InvalidApiKey | VeoError::ApiKeyNotFound => true,
            VeoError::PollFailed(inner) => inner.requires_new_key(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            VeoError::Api { status, .. } | VeoError::DownloadFailed { status } => Some(*status),
            VeoError::InvalidApiKey => Some(400),
            VeoError::ApiKeyNotFound => Some(404),
            VeoError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_errors_are_classified() {
        let err = VeoError::from_api_response(400, r#"{"error":{"message":"API key not valid. Please pass a valid API key."}}"#);
        assert!(matches!(err, VeoError::InvalidApiKey));
        assert!(err.requires_new_key());

        let err = VeoError::from_api_response(404, "Requested entity was not found.");
        assert!(matches!(err, VeoError::ApiKeyNotFound));
        assert!(err.requires_new_key());
    }

    #[test]
    fn test_other_errors_keep_status() {
        let err = VeoError::from_api_response(500, "boom");
        assert_eq!(err.http_status(), Some(500));
        assert!(!err.requires_new_key());
    }

    #[test]
    fn test_poll_failure_message_hides_cause() {
        let err = VeoError::PollFailed(Box::new(VeoError::ApiKeyNotFound));
        assert_eq!(err.to_string(), "Failed to get video generation status.");
        assert!(err.requires_new_key());
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            VeoError::Blocked("SAFETY".into()).to_string(),
            "Video generation blocked: SAFETY. Try a different prompt or image."
        );
        assert_eq!(
            VeoError::DownloadFailed { status: 403 }.to_string(),
            "Failed to download the generated video. Status: 403"
        );
    }
}
