//! Shared data models for MotionClip.
//!
//! This crate provides Serde-serializable types for:
//! - Generation parameters (resolution, camera configuration, presets)
//! - The background music catalog
//! - Persisted video projects and their owners
//! - Tag list editing helpers
//! - Image content type detection

pub mod camera;
pub mod error;
pub mod mime;
pub mod music;
pub mod project;
pub mod prompt;
pub mod resolution;
pub mod tags;
pub mod user;

// Re-export common types
pub use camera::{CameraConfig, CameraMovement, CameraPreset, ClipDuration, MovementSpeed, CAMERA_PRESETS};
pub use error::{ModelError, ModelResult};
pub use mime::image_mime_type;
pub use music::{MusicTrack, MUSIC_TRACKS};
pub use project::{Project, ProjectId, ProjectUpdate};
pub use prompt::{compose_prompt, DEFAULT_ANIMATION_PROMPT};
pub use resolution::VideoResolution;
pub use user::UserProfile;
