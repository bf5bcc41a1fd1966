//! Studio session state.
//!
//! Holds what the user is working on (image, prompt, camera, current clip,
//! project metadata) and drives generation, saving and browsing through
//! the ports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use mclip_media::MusicMix;
use mclip_models::{
    tags, CameraConfig, CameraPreset, MusicTrack, Project, ProjectId, ProjectUpdate, UserProfile,
    VideoResolution,
};
use mclip_storage::StoredAsset;
use serde::Serialize;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};
use crate::logging::GenerationLogger;
use crate::orchestrator::{GenerationInput, GenerationOrchestrator, VideoHandle};
use crate::ports::{AssetStore, ProjectStore, VideoGenerator};

// =============================================================================
// Types
// =============================================================================

/// The clip currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CurrentVideo {
    /// Freshly generated, stored in the work directory
    Local(VideoHandle),
    /// A saved project's video
    Remote { url: String },
}

impl CurrentVideo {
    /// Path or URL, for display.
    pub fn location(&self) -> String {
        match self {
            CurrentVideo::Local(handle) => handle.path.display().to_string(),
            CurrentVideo::Remote { url } => url.clone(),
        }
    }
}

/// Which projects `load_projects` fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectScope {
    #[default]
    All,
    /// Only the signed-in user's projects
    Mine,
}

// =============================================================================
// Session
// =============================================================================

pub struct StudioSession {
    orchestrator: GenerationOrchestrator,
    project_store: Option<Arc<dyn ProjectStore>>,
    asset_store: Option<Arc<dyn AssetStore>>,
    http: reqwest::Client,
    music_volume: f32,

    user: Option<UserProfile>,
    image: Option<PathBuf>,
    prompt: String,
    resolution: VideoResolution,
    music: &'static MusicTrack,
    camera: Option<CameraConfig>,
    video: Option<CurrentVideo>,
    error: Option<String>,
    description: String,
    tags: Vec<String>,
    current_project_id: Option<ProjectId>,
    /// Owner of the selected project
    current_project_owner: Option<String>,
    projects: Vec<Project>,
    scope: ProjectScope,
    api_key_selected: bool,
}

impl StudioSession {
    pub fn new(config: StudioConfig, generator: Option<Arc<dyn VideoGenerator>>) -> Self {
        let api_key_selected = generator.is_some();
        Self {
            orchestrator: GenerationOrchestrator::new(generator, config.work_dir),
            project_store: None,
            asset_store: None,
            http: reqwest::Client::new(),
            music_volume: config.music_volume,
            user: config.user,
            image: None,
            prompt: String::new(),
            resolution: VideoResolution::default(),
            music: MusicTrack::none(),
            camera: None,
            video: None,
            error: None,
            description: String::new(),
            tags: Vec::new(),
            current_project_id: None,
            current_project_owner: None,
            projects: Vec::new(),
            scope: ProjectScope::default(),
            api_key_selected,
        }
    }

    pub fn with_project_store(mut self, store: Arc<dyn ProjectStore>) -> Self {
        self.project_store = Some(store);
        self
    }

    pub fn with_asset_store(mut self, store: Arc<dyn AssetStore>) -> Self {
        self.asset_store = Some(store);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn resolution(&self) -> VideoResolution {
        self.resolution
    }

    pub fn music(&self) -> &'static MusicTrack {
        self.music
    }

    pub fn camera(&self) -> Option<&CameraConfig> {
        self.camera.as_ref()
    }

    pub fn video(&self) -> Option<&CurrentVideo> {
        self.video.as_ref()
    }

    /// Message of the last failed action.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn current_project_id(&self) -> Option<&ProjectId> {
        self.current_project_id.as_ref()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn api_key_selected(&self) -> bool {
        self.api_key_selected
    }

    pub fn is_busy(&self) -> bool {
        self.orchestrator.is_busy()
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    pub fn sign_in(&mut self, user: UserProfile) {
        info!(uid = %user.uid, "Signed in");
        self.user = Some(user);
    }

    /// Replace the source image. The current clip no longer matches it.
    pub fn set_image(&mut self, path: impl Into<PathBuf>) {
        self.image = Some(path.into());
        self.video = None;
        self.error = None;
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_resolution(&mut self, resolution: VideoResolution) {
        self.resolution = resolution;
    }

    /// Select a music track by name; unknown names select no music.
    pub fn set_music(&mut self, name: &str) -> &'static MusicTrack {
        self.music = MusicTrack::find_by_name(name);
        self.music
    }

    pub fn set_camera(&mut self, camera: CameraConfig) -> StudioResult<()> {
        camera.validate()?;
        self.camera = Some(camera);
        Ok(())
    }

    pub fn clear_camera(&mut self) {
        self.camera = None;
    }

    pub fn apply_preset(&mut self, preset: &CameraPreset) {
        debug!(preset = preset.name, "Applying camera preset");
        self.camera = Some(preset.config());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn add_tag(&mut self, tag: &str) -> bool {
        tags::add_tag(&mut self.tags, tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        tags::remove_tag(&mut self.tags, tag)
    }

    /// Use a new generator, typically after the previous key was rejected.
    pub fn set_generator(&mut self, generator: Arc<dyn VideoGenerator>) {
        self.orchestrator.set_generator(generator);
        self.api_key_selected = true;
        self.error = None;
    }

    // -------------------------------------------------------------------------
    // Generation
    // -------------------------------------------------------------------------

    /// Generate a clip from the current image, prompt and camera.
    ///
    /// Failures are also kept in [`error`](Self::error). A rejected API key
    /// clears the key flag so the caller can ask for another one.
    pub async fn generate(&mut self) -> StudioResult<VideoHandle> {
        let input = GenerationInput {
            image: self.image.clone(),
            prompt: self.prompt.clone(),
            resolution: self.resolution,
            camera: self.camera,
        };

        match self.generate_inner(&input).await {
            Ok(handle) => {
                self.video = Some(CurrentVideo::Local(handle.clone()));
                Ok(handle)
            }
            Err(e) => {
                if e.requires_new_key() {
                    self.api_key_selected = false;
                }
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn generate_inner(&mut self, input: &GenerationInput) -> StudioResult<VideoHandle> {
        self.orchestrator.validate(input)?;
        if !self.api_key_selected {
            return Err(mclip_veo::VeoError::MissingApiKey.into());
        }

        self.error = None;
        self.video = None;
        self.orchestrator.generate(input).await
    }

    /// Drop the current clip so the same inputs can be generated again.
    pub fn regenerate(&mut self) {
        self.video = None;
        self.forget_current_project();
    }

    /// Start over, keeping identity and the loaded project list.
    pub fn new_video(&mut self) {
        self.image = None;
        self.prompt.clear();
        self.resolution = VideoResolution::default();
        self.music = MusicTrack::none();
        self.camera = None;
        self.video = None;
        self.error = None;
        self.description.clear();
        self.tags.clear();
        self.forget_current_project();
    }

    fn forget_current_project(&mut self) {
        self.current_project_id = None;
        self.current_project_owner = None;
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!(uid = %user.uid, "Signed out");
        }
        self.video = None;
        self.image = None;
        self.prompt.clear();
        self.projects.clear();
    }

    // -------------------------------------------------------------------------
    // Projects
    // -------------------------------------------------------------------------

    fn project_store(&self) -> StudioResult<Arc<dyn ProjectStore>> {
        self.project_store
            .clone()
            .ok_or_else(|| StudioError::config_error("project store is not configured"))
    }

    fn asset_store(&self) -> StudioResult<Arc<dyn AssetStore>> {
        self.asset_store
            .clone()
            .ok_or_else(|| StudioError::config_error("asset storage is not configured"))
    }

    /// Save the current clip as a project, or update the selected project's
    /// description and tags. A project owned by someone else is saved as a
    /// new project of the signed-in user. Reloads the project list afterwards.
    pub async fn save(&mut self) -> StudioResult<ProjectId> {
        let user = self.user.clone().ok_or(StudioError::NotSignedIn)?;
        let video = self.video.clone().ok_or(StudioError::NoVideo)?;

        let editable = self
            .current_project_id
            .clone()
            .filter(|_| self.current_project_owner.as_deref() == Some(user.uid.as_str()));
        let result = match editable {
            Some(id) => self.update_current(id).await,
            None => {
                let logger = GenerationLogger::save(&user.uid);
                self.create_project(&user, &video, &logger)
                    .instrument(logger.span())
                    .await
                    .inspect_err(|e| logger.failed(e))
            }
        };

        let id = match result {
            Ok(id) => id,
            Err(e) => {
                self.error = Some(format!("Failed to save the project: {}", e));
                return Err(e);
            }
        };
        self.current_project_id = Some(id.clone());
        self.current_project_owner = Some(user.uid.clone());

        if let Err(e) = self.load_projects(self.scope).await {
            warn!(error = %e, "Project saved but the list could not be reloaded");
        }
        Ok(id)
    }

    async fn update_current(&self, id: ProjectId) -> StudioResult<ProjectId> {
        let update = ProjectUpdate {
            description: self.description.clone(),
            tags: self.tags.clone(),
        };
        self.project_store()?.update(&id, &update).await?;
        info!(project_id = %id, "Project updated");
        Ok(id)
    }

    async fn create_project(
        &self,
        user: &UserProfile,
        video: &CurrentVideo,
        logger: &GenerationLogger,
    ) -> StudioResult<ProjectId> {
        let store = self.project_store()?;
        let assets = self.asset_store()?;

        let image = match &self.image {
            Some(path) => {
                let asset = assets.upload_image(&user.uid, path).await?;
                logger.asset_uploaded("image", &asset.key);
                Some(asset)
            }
            None => None,
        };

        // Remote clips are fetched first so the project owns a copy.
        let (local_video, fetched) = match video {
            CurrentVideo::Local(handle) => (handle.path.clone(), false),
            CurrentVideo::Remote { url } => {
                let path = self.scratch_path("video", "mp4");
                self.fetch_to(url, &path).await?;
                (path, true)
            }
        };

        let uploaded = assets.upload_video(&user.uid, &local_video).await;
        let thumbnail = match &uploaded {
            Ok(_) => self.upload_thumbnail(assets.as_ref(), &user.uid, &local_video, logger).await,
            Err(_) => None,
        };
        if fetched {
            let _ = tokio::fs::remove_file(&local_video).await;
        }
        let uploaded = uploaded?;
        logger.asset_uploaded("video", &uploaded.key);

        let mut project = Project::new(
            user,
            image.as_ref().map(|a| a.url.clone()).unwrap_or_default(),
            uploaded.url,
            self.prompt.clone(),
        );
        project.image_path = image.map(|a| a.key);
        project.video_path = Some(uploaded.key);
        project.resolution = self.resolution;
        project.music_track = self.music.name.to_string();
        project.tags = self.tags.clone();
        project.description = Some(self.description.clone());
        if let Some(thumbnail) = thumbnail {
            project.thumbnail_url = Some(thumbnail.url);
            project.thumbnail_path = Some(thumbnail.key);
        }
        if let Some(camera) = &self.camera {
            project = project.with_camera(camera);
        }

        let id = store.create(&project).await?;
        logger.project_created(&id);
        Ok(id)
    }

    /// Best-effort thumbnail; a missing ffmpeg or failed upload only warns.
    async fn upload_thumbnail(
        &self,
        assets: &dyn AssetStore,
        uid: &str,
        video: &Path,
        logger: &GenerationLogger,
    ) -> Option<StoredAsset> {
        let thumb = self.scratch_path("thumb", "jpg");
        let result = async {
            mclip_media::generate_thumbnail(video, &thumb).await?;
            let asset = assets.upload_thumbnail(uid, &thumb).await?;
            Ok::<_, StudioError>(asset)
        }
        .await;
        let _ = tokio::fs::remove_file(&thumb).await;

        match result {
            Ok(asset) => {
                logger.asset_uploaded("thumbnail", &asset.key);
                Some(asset)
            }
            Err(e) => {
                logger.step_skipped("thumbnail", &e);
                None
            }
        }
    }

    /// Load a saved project into the session. The local image is dropped
    /// since it no longer matches the shown clip.
    pub fn select_project(&mut self, project: &Project) {
        self.image = None;
        self.video = Some(CurrentVideo::Remote {
            url: project.video_url.clone(),
        });
        self.prompt = project.prompt.clone();
        self.resolution = project.resolution;
        self.music = MusicTrack::find_by_name(&project.music_track);
        self.camera = project.camera_config();
        self.description = project.description.clone().unwrap_or_default();
        self.tags = project.tags.clone();
        self.current_project_id = project.id.clone();
        self.current_project_owner = Some(project.user_id.clone());
        self.error = None;
    }

    /// Fetch projects into the session, newest first.
    pub async fn load_projects(&mut self, scope: ProjectScope) -> StudioResult<&[Project]> {
        let store = self.project_store()?;
        let projects = match scope {
            ProjectScope::All => store.list_all().await?,
            ProjectScope::Mine => {
                let user = self.user.as_ref().ok_or(StudioError::NotSignedIn)?;
                store.list_for_user(&user.uid).await?
            }
        };

        debug!(count = projects.len(), ?scope, "Loaded projects");
        self.scope = scope;
        self.projects = projects;
        Ok(&self.projects)
    }

    /// Fetch one project by id.
    pub async fn find_project(&self, id: &ProjectId) -> StudioResult<Project> {
        self.project_store()?
            .get(id)
            .await?
            .ok_or_else(|| StudioError::ProjectNotFound(id.to_string()))
    }

    /// Delete a project record, then its stored image, video and thumbnail.
    ///
    /// Asset removal is best-effort once the record is gone.
    pub async fn delete_project(&mut self, id: &ProjectId) -> StudioResult<()> {
        let store = self.project_store()?;
        let project = match self.projects.iter().find(|p| p.id.as_ref() == Some(id)) {
            Some(project) => Some(project.clone()),
            None => store.get(id).await?,
        };

        store.delete(id).await?;
        self.projects.retain(|p| p.id.as_ref() != Some(id));
        if self.current_project_id.as_ref() == Some(id) {
            self.forget_current_project();
        }
        info!(project_id = %id, "Project deleted");

        let keys = project.map(|p| p.asset_keys()).unwrap_or_default();
        if keys.is_empty() {
            return Ok(());
        }
        match &self.asset_store {
            Some(assets) => {
                if let Err(e) = assets.delete(&keys).await {
                    warn!(project_id = %id, error = %e, "Project assets could not be removed");
                }
            }
            None => warn!(project_id = %id, assets = keys.len(), "Asset storage not configured, assets left in place"),
        }
        Ok(())
    }

    /// Loaded projects carrying `tag` (case-insensitive).
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&Project> {
        let tag = tag.trim();
        self.projects.iter().filter(|p| p.has_tag(tag)).collect()
    }

    // -------------------------------------------------------------------------
    // Download
    // -------------------------------------------------------------------------

    /// Write the current clip to `{dest_dir}/video_{millis}.mp4`.
    ///
    /// The selected music track is mixed in when ffmpeg is available;
    /// otherwise the clip is written as generated.
    pub async fn download(&self, dest_dir: impl AsRef<Path>) -> StudioResult<PathBuf> {
        let video = self.video.as_ref().ok_or(StudioError::NoVideo)?;
        let dest_dir = dest_dir.as_ref();
        tokio::fs::create_dir_all(dest_dir).await?;
        let dest = dest_dir.join(format!("video_{}.mp4", Utc::now().timestamp_millis()));

        match video {
            CurrentVideo::Local(handle) => {
                tokio::fs::copy(&handle.path, &dest).await?;
            }
            CurrentVideo::Remote { url } => self.fetch_to(url, &dest).await?,
        }

        if !self.music.is_none() {
            self.mix_music(&dest).await;
        }

        info!(path = %dest.display(), music = self.music.name, "Video downloaded");
        Ok(dest)
    }

    async fn mix_music(&self, dest: &Path) {
        if mclip_media::check_ffmpeg().is_err() {
            warn!("ffmpeg not found, downloading without music");
            return;
        }

        let mixed = dest.with_extension("music.mp4");
        let mix = MusicMix::default().with_music_volume(self.music_volume);
        let result = async {
            mclip_media::overlay_music(dest, self.music.url, &mixed, mix).await?;
            tokio::fs::rename(&mixed, dest).await?;
            Ok::<_, StudioError>(())
        }
        .await;

        if let Err(e) = result {
            warn!(error = %e, "Music overlay failed, keeping the clip without music");
            let _ = tokio::fs::remove_file(&mixed).await;
        }
    }

    async fn fetch_to(&self, url: &str, dest: &Path) -> StudioResult<()> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::DownloadFailed {
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }

    fn scratch_path(&self, prefix: &str, ext: &str) -> PathBuf {
        self.orchestrator
            .work_dir()
            .join(format!("{}_{}.{}", prefix, Uuid::new_v4().simple(), ext))
    }
}
