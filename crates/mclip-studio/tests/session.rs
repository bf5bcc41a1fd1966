//! Session flows against in-memory ports.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mclip_firestore::FirestoreResult;
use mclip_models::{
    CameraPreset, MusicTrack, Project, ProjectId, ProjectUpdate, UserProfile, VideoResolution,
};
use mclip_storage::{StorageResult, StoredAsset};
use mclip_studio::{
    AssetStore, CurrentVideo, ProjectScope, ProjectStore, StudioConfig, StudioError,
    StudioSession, VideoGenerator,
};
use mclip_veo::{GeneratedVideo, VeoError, VeoResult, VideoRequest};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Fakes
// =============================================================================

enum Outcome {
    Video(&'static [u8]),
    InvalidKey,
}

struct FakeGenerator {
    outcome: Outcome,
    calls: Mutex<usize>,
}

impl FakeGenerator {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(0),
        })
    }
}

#[async_trait]
impl VideoGenerator for FakeGenerator {
    async fn generate(&self, _request: &VideoRequest) -> VeoResult<GeneratedVideo> {
        *self.calls.lock().unwrap() += 1;
        match self.outcome {
            Outcome::Video(bytes) => Ok(GeneratedVideo {
                bytes: bytes.to_vec().into(),
                uri: "https://veo.test/files/1".into(),
                operation_name: "models/veo/operations/1".into(),
            }),
            Outcome::InvalidKey => Err(VeoError::InvalidApiKey),
        }
    }
}

#[derive(Default)]
struct FakeStore {
    projects: Mutex<Vec<Project>>,
    updates: Mutex<Vec<(ProjectId, ProjectUpdate)>>,
}

#[async_trait]
impl ProjectStore for FakeStore {
    async fn create(&self, project: &Project) -> FirestoreResult<ProjectId> {
        let id = ProjectId::new();
        let mut stored = project.clone();
        stored.id = Some(id.clone());
        self.projects.lock().unwrap().push(stored);
        Ok(id)
    }

    async fn update(&self, id: &ProjectId, update: &ProjectUpdate) -> FirestoreResult<()> {
        self.updates.lock().unwrap().push((id.clone(), update.clone()));
        if let Some(p) = self
            .projects
            .lock()
            .unwrap()
            .iter_mut()
            .find(|p| p.id.as_ref() == Some(id))
        {
            p.apply_update(update);
        }
        Ok(())
    }

    async fn get(&self, id: &ProjectId) -> FirestoreResult<Option<Project>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id.as_ref() == Some(id))
            .cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> FirestoreResult<Vec<Project>> {
        let mut all = self.list_all().await?;
        all.retain(|p| p.user_id == user_id);
        Ok(all)
    }

    async fn list_all(&self) -> FirestoreResult<Vec<Project>> {
        let mut all = self.projects.lock().unwrap().clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn delete(&self, id: &ProjectId) -> FirestoreResult<()> {
        self.projects
            .lock()
            .unwrap()
            .retain(|p| p.id.as_ref() != Some(id));
        Ok(())
    }
}

#[derive(Default)]
struct FakeAssets {
    uploads: Mutex<Vec<(String, Vec<u8>)>>,
    deleted: Mutex<Vec<String>>,
}

impl FakeAssets {
    fn record(&self, kind: &str, uid: &str, path: &Path) -> StorageResult<StoredAsset> {
        let bytes = std::fs::read(path).expect("uploaded file must exist");
        let key = format!("users/{}/{}/{}", uid, kind, path.file_name().unwrap().to_string_lossy());
        self.uploads.lock().unwrap().push((kind.to_string(), bytes));
        Ok(StoredAsset {
            url: format!("https://cdn.test/{}", key),
            key,
        })
    }

    fn kinds(&self) -> Vec<String> {
        self.uploads.lock().unwrap().iter().map(|(k, _)| k.clone()).collect()
    }

    fn uploaded(&self, kind: &str) -> Option<Vec<u8>> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, bytes)| bytes.clone())
    }
}

#[async_trait]
impl AssetStore for FakeAssets {
    async fn upload_image(&self, user_id: &str, path: &Path) -> StorageResult<StoredAsset> {
        self.record("images", user_id, path)
    }

    async fn upload_video(&self, user_id: &str, path: &Path) -> StorageResult<StoredAsset> {
        self.record("videos", user_id, path)
    }

    async fn upload_thumbnail(&self, user_id: &str, path: &Path) -> StorageResult<StoredAsset> {
        self.record("thumbnails", user_id, path)
    }

    async fn delete(&self, keys: &[String]) -> StorageResult<u32> {
        self.deleted.lock().unwrap().extend(keys.iter().cloned());
        Ok(keys.len() as u32)
    }
}

// =============================================================================
// Helpers
// =============================================================================

struct Fixture {
    dir: TempDir,
    store: Arc<FakeStore>,
    assets: Arc<FakeAssets>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            store: Arc::new(FakeStore::default()),
            assets: Arc::new(FakeAssets::default()),
        }
    }

    fn session(&self, generator: Option<Arc<FakeGenerator>>, user: Option<UserProfile>) -> StudioSession {
        let mut config = StudioConfig::default().with_work_dir(self.dir.path().join("work"));
        config.user = user;
        let generator = generator.map(|g| g as Arc<dyn VideoGenerator>);
        StudioSession::new(config, generator)
            .with_project_store(self.store.clone())
            .with_asset_store(self.assets.clone())
    }

    fn image(&self) -> PathBuf {
        let path = self.dir.path().join("beach.jpg");
        std::fs::write(&path, b"jpeg").unwrap();
        path
    }
}

fn ada() -> UserProfile {
    UserProfile::new("u1", "ada@example.com").with_display_name("Ada")
}

fn saved_project(owner: &UserProfile, prompt: &str, tags: &[&str]) -> Project {
    let mut project = Project::new(owner, "https://cdn.test/i.jpg", "https://cdn.test/v.mp4", prompt);
    project.id = Some(ProjectId::new());
    project.tags = tags.iter().map(|t| t.to_string()).collect();
    project
}

// =============================================================================
// Generation
// =============================================================================

#[tokio::test]
async fn test_generate_stores_local_clip() {
    let fx = Fixture::new();
    let generator = FakeGenerator::new(Outcome::Video(b"clip"));
    let mut session = fx.session(Some(generator.clone()), None);

    session.set_image(fx.image());
    session.set_prompt("Waves roll in");
    session.apply_preset(CameraPreset::find("Orbital View").unwrap());

    let handle = session.generate().await.unwrap();
    assert_eq!(std::fs::read(&handle.path).unwrap(), b"clip");
    assert!(matches!(session.video(), Some(CurrentVideo::Local(h)) if h == &handle));
    assert!(session.error().is_none());
    assert_eq!(*generator.calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_generate_validation_is_reported() {
    let fx = Fixture::new();
    let generator = FakeGenerator::new(Outcome::Video(b"clip"));
    let mut session = fx.session(Some(generator.clone()), None);

    assert!(matches!(session.generate().await, Err(StudioError::MissingImage)));
    assert_eq!(session.error(), Some("Upload an image first"));

    session.set_image(fx.image());
    assert!(session.error().is_none());
    assert!(matches!(session.generate().await, Err(StudioError::MissingPrompt)));
    assert_eq!(session.error(), Some("Describe the animation"));
    assert_eq!(*generator.calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_rejected_key_clears_flag_until_replaced() {
    let fx = Fixture::new();
    let mut session = fx.session(Some(FakeGenerator::new(Outcome::InvalidKey)), None);
    session.set_image(fx.image());
    session.set_prompt("wave");

    assert!(session.api_key_selected());
    let err = session.generate().await.unwrap_err();
    assert!(err.requires_new_key());
    assert!(!session.api_key_selected());
    assert_eq!(session.error(), Some(VeoError::InvalidApiKey.to_string().as_str()));

    // Without a key the service is not called again.
    let err = session.generate().await.unwrap_err();
    assert!(matches!(err, StudioError::Veo(VeoError::MissingApiKey)));

    session.set_generator(FakeGenerator::new(Outcome::Video(b"ok")));
    assert!(session.api_key_selected());
    assert!(session.error().is_none());
    session.generate().await.unwrap();
}

#[tokio::test]
async fn test_no_generator_means_missing_key() {
    let fx = Fixture::new();
    let mut session = fx.session(None, None);
    session.set_image(fx.image());
    session.set_prompt("wave");

    assert!(!session.api_key_selected());
    let err = session.generate().await.unwrap_err();
    assert_eq!(err.to_string(), "API key not found. Please select your API Key.");
}

// =============================================================================
// Saving
// =============================================================================

#[tokio::test]
async fn test_save_requires_user_and_video() {
    let fx = Fixture::new();
    let mut session = fx.session(Some(FakeGenerator::new(Outcome::Video(b"clip"))), None);
    assert!(matches!(session.save().await, Err(StudioError::NotSignedIn)));

    session.sign_in(ada());
    assert!(matches!(session.save().await, Err(StudioError::NoVideo)));
    assert!(fx.store.projects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_save_creates_then_updates() {
    let fx = Fixture::new();
    let mut session = fx.session(Some(FakeGenerator::new(Outcome::Video(b"clip"))), Some(ada()));

    session.set_image(fx.image());
    session.set_prompt("Waves roll in");
    session.set_resolution(VideoResolution::P1080);
    session.set_music("modern lounge");
    session.apply_preset(CameraPreset::find("drone-rise").unwrap());
    session.set_description("Morning surf");
    assert!(session.add_tag("beach"));
    assert!(!session.add_tag(" beach "));
    session.generate().await.unwrap();

    let id = session.save().await.unwrap();
    assert_eq!(session.current_project_id(), Some(&id));

    let kinds = fx.assets.kinds();
    assert_eq!(&kinds[..2], ["images", "videos"]);

    let stored = fx.store.projects.lock().unwrap()[0].clone();
    assert_eq!(stored.user_id, "u1");
    assert_eq!(stored.user_name.as_deref(), Some("Ada"));
    assert_eq!(stored.prompt, "Waves roll in");
    assert_eq!(stored.resolution, VideoResolution::P1080);
    assert_eq!(stored.music_track, "Modern Lounge");
    assert_eq!(stored.tags, vec!["beach".to_string()]);
    assert_eq!(stored.description.as_deref(), Some("Morning surf"));
    assert!(stored.image_url.starts_with("https://cdn.test/users/u1/images/"));
    assert!(stored.video_url.starts_with("https://cdn.test/users/u1/videos/"));
    assert_eq!(
        stored.camera_config(),
        Some(CameraPreset::find("drone-rise").unwrap().config())
    );

    // The list is reloaded after saving.
    assert_eq!(session.projects().len(), 1);

    // Saving again edits the same project.
    session.set_description("Evening surf");
    session.add_tag("sunset");
    let again = session.save().await.unwrap();
    assert_eq!(again, id);
    assert_eq!(fx.store.projects.lock().unwrap().len(), 1);

    let updates = fx.store.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].1.description, "Evening surf");
    assert_eq!(updates[0].1.tags, vec!["beach".to_string(), "sunset".to_string()]);
}

#[tokio::test]
async fn test_save_foreign_project_stores_own_copy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/grace/v.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"remote clip".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let grace = UserProfile::new("u2", "grace@example.com");
    let mut original = saved_project(&grace, "Skyline", &["city"]);
    original.video_url = format!("{}/grace/v.mp4", server.uri());
    original.music_track = "Lounge Moderno".into();
    let original_id = original.id.clone().unwrap();
    fx.store.projects.lock().unwrap().push(original.clone());

    let mut session = fx.session(None, Some(ada()));
    session.set_image(fx.image());
    session.select_project(&original);
    assert!(session.image().is_none());
    assert_eq!(session.music().name, "Modern Lounge");

    let id = session.save().await.unwrap();
    assert_ne!(id, original_id);
    assert_eq!(session.current_project_id(), Some(&id));
    assert!(fx.store.updates.lock().unwrap().is_empty());

    // The fetched clip is uploaded and the scratch copy removed.
    assert_eq!(fx.assets.uploaded("videos").as_deref(), Some(&b"remote clip"[..]));
    assert!(fx.assets.uploaded("images").is_none());
    let leftovers = std::fs::read_dir(fx.dir.path().join("work"))
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);

    let copy = fx.store.get(&id).await.unwrap().unwrap();
    assert_eq!(copy.user_id, "u1");
    assert_eq!(copy.prompt, "Skyline");
    assert_eq!(copy.music_track, "Modern Lounge");
    assert!(copy.video_path.unwrap().starts_with("users/u1/videos/"));

    // Saving again edits the copy, not the original.
    session.add_tag("mine");
    assert_eq!(session.save().await.unwrap(), id);
    let updates = fx.store.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, id);
}

#[tokio::test]
async fn test_save_reports_failed_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let mut original = saved_project(&UserProfile::new("u2", "grace@example.com"), "gone", &[]);
    original.video_url = format!("{}/v.mp4", server.uri());

    let mut session = fx.session(None, Some(ada()));
    session.select_project(&original);
    assert!(matches!(
        session.save().await,
        Err(StudioError::DownloadFailed { status: 404 })
    ));
    assert!(session.error().unwrap().starts_with("Failed to save the project"));
    assert!(session.current_project_id().is_some_and(|id| Some(id) == original.id.as_ref()));
    assert!(fx.assets.kinds().is_empty());
}

// =============================================================================
// Browsing
// =============================================================================

#[tokio::test]
async fn test_select_project_restores_inputs() {
    let fx = Fixture::new();
    let mut session = fx.session(None, Some(ada()));

    let mut project = saved_project(&ada(), "Dance", &["party"]);
    project.music_track = "Deleted Track".into();
    project.resolution = VideoResolution::P1080;
    project.description = Some("Night".into());
    let project = project.with_camera(&CameraPreset::find("dynamic-pan").unwrap().config());

    session.select_project(&project);
    assert_eq!(session.prompt(), "Dance");
    assert_eq!(session.resolution(), VideoResolution::P1080);
    assert_eq!(session.music(), MusicTrack::none());
    assert_eq!(session.description(), "Night");
    assert_eq!(session.tags(), ["party".to_string()]);
    assert_eq!(session.current_project_id(), project.id.as_ref());
    assert_eq!(
        session.video().map(|v| v.location()),
        Some("https://cdn.test/v.mp4".to_string())
    );
    assert_eq!(session.camera().map(|c| c.intensity), Some(5));

    session.regenerate();
    assert!(session.video().is_none());
    assert!(session.current_project_id().is_none());
    assert_eq!(session.prompt(), "Dance");
}

#[tokio::test]
async fn test_new_video_and_sign_out() {
    let fx = Fixture::new();
    fx.store.projects.lock().unwrap().push(saved_project(&ada(), "a", &[]));
    let mut session = fx.session(None, Some(ada()));
    session.load_projects(ProjectScope::All).await.unwrap();

    session.set_image(fx.image());
    session.set_prompt("wave");
    session.set_music("Calm Ambient");
    session.add_tag("x");

    session.new_video();
    assert!(session.image().is_none());
    assert!(session.prompt().is_empty());
    assert!(session.tags().is_empty());
    assert_eq!(session.music(), MusicTrack::none());
    assert!(session.user().is_some());
    assert_eq!(session.projects().len(), 1);

    session.set_image(fx.image());
    session.set_prompt("again");
    session.sign_out();
    assert!(session.user().is_none());
    assert!(session.image().is_none());
    assert!(session.prompt().is_empty());
    assert!(session.projects().is_empty());
}

#[tokio::test]
async fn test_load_projects_by_scope_and_tag() {
    let fx = Fixture::new();
    let grace = UserProfile::new("u2", "grace@example.com");
    {
        let mut projects = fx.store.projects.lock().unwrap();
        projects.push(saved_project(&ada(), "one", &["Beach"]));
        projects.push(saved_project(&grace, "two", &["city"]));
        projects.push(saved_project(&ada(), "three", &["city", "night"]));
    }

    let mut session = fx.session(None, None);
    assert_eq!(session.load_projects(ProjectScope::All).await.unwrap().len(), 3);
    assert!(matches!(
        session.load_projects(ProjectScope::Mine).await,
        Err(StudioError::NotSignedIn)
    ));

    session.sign_in(ada());
    let mine = session.load_projects(ProjectScope::Mine).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|p| p.user_id == "u1"));

    assert_eq!(session.filter_by_tag("beach").len(), 1);
    assert_eq!(session.filter_by_tag("city").len(), 1);
    assert!(session.filter_by_tag("forest").is_empty());
}

#[tokio::test]
async fn test_delete_project_forgets_selection() {
    let fx = Fixture::new();
    let project = saved_project(&ada(), "gone", &[]);
    let id = project.id.clone().unwrap();
    fx.store.projects.lock().unwrap().push(project.clone());

    let mut session = fx.session(None, Some(ada()));
    session.load_projects(ProjectScope::All).await.unwrap();
    session.select_project(&project);

    session.delete_project(&id).await.unwrap();
    assert!(session.projects().is_empty());
    assert!(session.current_project_id().is_none());
    assert!(matches!(
        session.find_project(&id).await,
        Err(StudioError::ProjectNotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_project_removes_stored_assets() {
    let fx = Fixture::new();
    let mut project = saved_project(&ada(), "gone", &[]);
    project.image_path = Some("users/u1/images/1_beach.jpg".into());
    project.video_path = Some("users/u1/videos/1.mp4".into());
    project.thumbnail_path = Some("users/u1/thumbnails/1.jpg".into());
    let id = project.id.clone().unwrap();
    fx.store.projects.lock().unwrap().push(project);

    // Not in the loaded list, so the record is fetched first.
    let mut session = fx.session(None, Some(ada()));
    session.delete_project(&id).await.unwrap();

    assert!(fx.store.projects.lock().unwrap().is_empty());
    assert_eq!(
        *fx.assets.deleted.lock().unwrap(),
        vec![
            "users/u1/images/1_beach.jpg".to_string(),
            "users/u1/videos/1.mp4".to_string(),
            "users/u1/thumbnails/1.jpg".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_delete_project_without_keys_skips_storage() {
    let fx = Fixture::new();
    let project = saved_project(&ada(), "legacy", &[]);
    let id = project.id.clone().unwrap();
    fx.store.projects.lock().unwrap().push(project);

    let mut session = fx.session(None, Some(ada()));
    session.delete_project(&id).await.unwrap();
    assert!(fx.assets.deleted.lock().unwrap().is_empty());
}

// =============================================================================
// Download
// =============================================================================

#[tokio::test]
async fn test_download_local_clip() {
    let fx = Fixture::new();
    let mut session = fx.session(Some(FakeGenerator::new(Outcome::Video(b"clip"))), None);
    assert!(matches!(
        session.download(fx.dir.path()).await,
        Err(StudioError::NoVideo)
    ));

    session.set_image(fx.image());
    session.set_prompt("wave");
    session.generate().await.unwrap();

    let out = fx.dir.path().join("downloads");
    let path = session.download(&out).await.unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(path.starts_with(&out));
    assert!(name.starts_with("video_") && name.ends_with(".mp4"));
    assert_eq!(std::fs::read(&path).unwrap(), b"clip");
}

#[tokio::test]
async fn test_download_remote_clip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"remote".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let mut session = fx.session(None, None);

    let mut project = saved_project(&ada(), "remote", &[]);
    project.video_url = format!("{}/v.mp4", server.uri());
    session.select_project(&project);
    let path = session.download(fx.dir.path()).await.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"remote");

    project.video_url = format!("{}/missing.mp4", server.uri());
    session.select_project(&project);
    assert!(matches!(
        session.download(fx.dir.path()).await,
        Err(StudioError::DownloadFailed { status: 404 })
    ));
}

#[tokio::test]
async fn test_download_keeps_clip_when_music_cannot_be_mixed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not really an mp4".to_vec()))
        .mount(&server)
        .await;

    let fx = Fixture::new();
    let mut project = saved_project(&ada(), "music", &[]);
    project.video_url = format!("{}/v.mp4", server.uri());
    project.music_track = "Ambient Tranquilo".into();

    let mut session = fx.session(None, None);
    session.select_project(&project);
    assert_eq!(session.music().name, "Calm Ambient");

    // Without ffmpeg the mix is skipped; with it, probing the clip fails.
    let out = fx.dir.path().join("downloads");
    let path = session.download(&out).await.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"not really an mp4");

    let files: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(files, vec![path.file_name().unwrap().to_os_string()]);
}
