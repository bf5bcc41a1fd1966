//! Seams between the session and the remote services.

use std::path::Path;

use async_trait::async_trait;
use mclip_firestore::{FirestoreResult, ProjectRepository};
use mclip_models::{Project, ProjectId, ProjectUpdate};
use mclip_storage::{BlobClient, StorageResult, StoredAsset};
use mclip_veo::{GeneratedVideo, VeoClient, VeoResult, VideoRequest};

/// Turns an image and prompt into a finished clip.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    async fn generate(&self, request: &VideoRequest) -> VeoResult<GeneratedVideo>;
}

/// Persistence of project records.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create(&self, project: &Project) -> FirestoreResult<ProjectId>;
    async fn update(&self, id: &ProjectId, update: &ProjectUpdate) -> FirestoreResult<()>;
    async fn get(&self, id: &ProjectId) -> FirestoreResult<Option<Project>>;
    /// Projects owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &str) -> FirestoreResult<Vec<Project>>;
    /// Every project, newest first.
    async fn list_all(&self) -> FirestoreResult<Vec<Project>>;
    async fn delete(&self, id: &ProjectId) -> FirestoreResult<()>;
}

/// Storage of project binaries.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload_image(&self, user_id: &str, path: &Path) -> StorageResult<StoredAsset>;
    async fn upload_video(&self, user_id: &str, path: &Path) -> StorageResult<StoredAsset>;
    async fn upload_thumbnail(&self, user_id: &str, path: &Path) -> StorageResult<StoredAsset>;
    /// Remove the given keys; returns how many were requested.
    async fn delete(&self, keys: &[String]) -> StorageResult<u32>;
}

#[async_trait]
impl VideoGenerator for VeoClient {
    async fn generate(&self, request: &VideoRequest) -> VeoResult<GeneratedVideo> {
        VeoClient::generate(self, request).await
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn create(&self, project: &Project) -> FirestoreResult<ProjectId> {
        ProjectRepository::create(self, project).await
    }

    async fn update(&self, id: &ProjectId, update: &ProjectUpdate) -> FirestoreResult<()> {
        ProjectRepository::update(self, id, update).await
    }

    async fn get(&self, id: &ProjectId) -> FirestoreResult<Option<Project>> {
        ProjectRepository::get(self, id).await
    }

    async fn list_for_user(&self, user_id: &str) -> FirestoreResult<Vec<Project>> {
        ProjectRepository::list_for_user(self, user_id).await
    }

    async fn list_all(&self) -> FirestoreResult<Vec<Project>> {
        ProjectRepository::list_all(self).await
    }

    async fn delete(&self, id: &ProjectId) -> FirestoreResult<()> {
        ProjectRepository::delete(self, id).await
    }
}

#[async_trait]
impl AssetStore for BlobClient {
    async fn upload_image(&self, user_id: &str, path: &Path) -> StorageResult<StoredAsset> {
        self.upload_project_image(user_id, path).await
    }

    async fn upload_video(&self, user_id: &str, path: &Path) -> StorageResult<StoredAsset> {
        self.upload_project_video(user_id, path).await
    }

    async fn upload_thumbnail(&self, user_id: &str, path: &Path) -> StorageResult<StoredAsset> {
        self.upload_project_thumbnail(user_id, path).await
    }

    async fn delete(&self, keys: &[String]) -> StorageResult<u32> {
        self.delete_objects(keys).await
    }
}
