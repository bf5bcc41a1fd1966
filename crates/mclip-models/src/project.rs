//! Persisted video projects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::camera::{CameraConfig, CameraMovement, ClipDuration, MovementSpeed};
use crate::resolution::VideoResolution;
use crate::user::UserProfile;

/// Length of generated project ids, matching document store auto-ids.
pub const PROJECT_ID_LEN: usize = 20;

/// Unique identifier for a saved project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    /// Generate a new random 20-character id.
    pub fn new() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(PROJECT_ID_LEN);
        Self(id)
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A saved generation: source image, resulting video, parameters and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProjectId>,
    pub user_id: String,
    pub user_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_photo: Option<String>,
    pub image_url: String,
    pub video_url: String,
    /// Blob key of the source image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Blob key of the video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    pub prompt: String,
    #[serde(default)]
    pub resolution: VideoResolution,
    /// Music track name, `None` for silence.
    pub music_track: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Blob key of the thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_movement: Option<CameraMovement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_speed: Option<MovementSpeed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<ClipDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
}

impl Project {
    /// New unsaved project owned by `owner`.
    pub fn new(
        owner: &UserProfile,
        image_url: impl Into<String>,
        video_url: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            user_id: owner.uid.clone(),
            user_email: owner.email.clone(),
            user_name: owner.display_name.clone(),
            user_photo: owner.photo_url.clone(),
            image_url: image_url.into(),
            video_url: video_url.into(),
            image_path: None,
            video_path: None,
            prompt: prompt.into(),
            resolution: VideoResolution::default(),
            music_track: "None".to_string(),
            tags: Vec::new(),
            description: None,
            created_at: Utc::now(),
            updated_at: None,
            thumbnail_url: None,
            thumbnail_path: None,
            camera_movement: None,
            movement_speed: None,
            duration: None,
            intensity: None,
        }
    }

    pub fn with_camera(mut self, camera: &CameraConfig) -> Self {
        self.camera_movement = Some(camera.movement);
        self.movement_speed = Some(camera.speed);
        self.duration = Some(camera.duration);
        self.intensity = Some(camera.intensity);
        self
    }

    /// Stored camera configuration. Missing fields take their defaults;
    /// `None` when no camera field was stored at all.
    pub fn camera_config(&self) -> Option<CameraConfig> {
        if self.camera_movement.is_none()
            && self.movement_speed.is_none()
            && self.duration.is_none()
            && self.intensity.is_none()
        {
            return None;
        }
        let defaults = CameraConfig::default();
        Some(CameraConfig {
            movement: self.camera_movement.unwrap_or(defaults.movement),
            speed: self.movement_speed.unwrap_or(defaults.speed),
            duration: self.duration.unwrap_or(defaults.duration),
            intensity: self.intensity.unwrap_or(defaults.intensity),
        })
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Blob keys of every stored asset of this project.
    pub fn asset_keys(&self) -> Vec<String> {
        [&self.image_path, &self.video_path, &self.thumbnail_path]
            .into_iter()
            .flatten()
            .filter(|k| !k.is_empty())
            .cloned()
            .collect()
    }

    /// Apply an edit to description and tags, stamping `updated_at`.
    pub fn apply_update(&mut self, update: &ProjectUpdate) {
        self.description = Some(update.description.clone());
        self.tags = update.tags.clone();
        self.updated_at = Some(Utc::now());
    }
}

/// The editable part of a saved project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub description: String,
    pub tags: Vec<String>,
}
