//! Studio error types.

use std::path::PathBuf;

use thiserror::Error;

pub type StudioResult<T> = Result<T, StudioError>;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Upload an image first")]
    MissingImage,

    #[error("Describe the animation")]
    MissingPrompt,

    #[error("Unsupported image type: {}", .0.display())]
    UnsupportedImage(PathBuf),

    #[error("A video is already being generated")]
    GenerationInProgress,

    #[error("Sign in to save projects")]
    NotSignedIn,

    #[error("Generate or select a video first")]
    NoVideo,

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to download the video. Status: {status}")]
    DownloadFailed { status: u16 },

    #[error(transparent)]
    Veo(#[from] mclip_veo::VeoError),

    #[error("Project store error: {0}")]
    Firestore(#[from] mclip_firestore::FirestoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] mclip_storage::StorageError),

    #[error("Media error: {0}")]
    Media(#[from] mclip_media::MediaError),

    #[error(transparent)]
    Model(#[from] mclip_models::ModelError),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the user has to pick a different API key before retrying.
    pub fn requires_new_key(&self) -> bool {
        match self {
            Self::Veo(e) => e.requires_new_key(),
            _ => false,
        }
    }
}
