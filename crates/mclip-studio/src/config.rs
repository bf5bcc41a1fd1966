//! Studio configuration.

use std::path::PathBuf;

use mclip_media::DEFAULT_MUSIC_VOLUME;
use mclip_models::UserProfile;

/// Studio configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Directory holding generated clips and temporary files
    pub work_dir: PathBuf,
    /// Signed-in identity; `None` when signed out
    pub user: Option<UserProfile>,
    /// Music level used when mixing downloads
    pub music_volume: f32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("mclip"),
            user: None,
            music_volume: DEFAULT_MUSIC_VOLUME,
        }
    }
}

impl StudioConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let user = non_empty_var("MCLIP_USER_ID").map(|uid| {
            let mut profile =
                UserProfile::new(uid, non_empty_var("MCLIP_USER_EMAIL").unwrap_or_default());
            if let Some(name) = non_empty_var("MCLIP_USER_NAME") {
                profile = profile.with_display_name(name);
            }
            if let Some(photo) = non_empty_var("MCLIP_USER_PHOTO") {
                profile = profile.with_photo_url(photo);
            }
            profile
        });

        Self {
            work_dir: non_empty_var("MCLIP_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            user,
            music_volume: std::env::var("MCLIP_MUSIC_VOLUME")
                .ok()
                .and_then(|s| s.parse::<f32>().ok())
                .filter(|v| (0.0..=1.0).contains(v))
                .unwrap_or(defaults.music_volume),
        }
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = Some(user);
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
