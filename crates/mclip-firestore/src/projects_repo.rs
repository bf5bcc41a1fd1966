//! Repository for saved video projects.
//!
//! Projects live in the top-level `videoProjects` collection with camelCase
//! field names. Ids are generated client-side.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use mclip_models::{Project, ProjectId, ProjectUpdate};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Direction, Document, FromFirestoreValue, StructuredQuery, ToFirestoreValue, Value};

/// Collection holding all projects.
pub const PROJECTS_COLLECTION: &str = "videoProjects";

/// Repository for `videoProjects` documents.
#[derive(Clone)]
pub struct ProjectRepository {
    client: FirestoreClient,
}

impl ProjectRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Store a new project and return its id. Any id on `project` is ignored.
    pub async fn create(&self, project: &Project) -> FirestoreResult<ProjectId> {
        let id = ProjectId::new();
        let fields = project_to_fields(project);

        let attempts = AtomicU32::new(0);
        self.client
            .with_retry("create_project", || {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                let request =
                    self.client
                        .create_document(PROJECTS_COLLECTION, id.as_str(), fields.clone());
                let id = &id;
                async move {
                    match request.await {
                        Ok(_) => Ok(()),
                        // An earlier attempt was committed but its reply was lost.
                        Err(FirestoreError::AlreadyExists(_)) if attempt > 1 => {
                            warn!(project_id = %id, attempt, "Project already stored by an earlier attempt");
                            Ok(())
                        }
                        Err(e) => Err(e),
                    }
                }
            })
            .await?;

        info!(project_id = %id, user_id = %project.user_id, "Created project");
        Ok(id)
    }

    /// Overwrite description and tags, stamping `updatedAt`.
    pub async fn update(&self, id: &ProjectId, update: &ProjectUpdate) -> FirestoreResult<()> {
        let fields = update_to_fields(update, Utc::now());
        let mask: Vec<String> = fields.keys().cloned().collect();

        self.client
            .with_retry("update_project", || {
                self.client.update_document(
                    PROJECTS_COLLECTION,
                    id.as_str(),
                    fields.clone(),
                    Some(mask.clone()),
                )
            })
            .await?;

        info!(project_id = %id, tags = update.tags.len(), "Updated project");
        Ok(())
    }

    pub async fn get(&self, id: &ProjectId) -> FirestoreResult<Option<Project>> {
        let doc = self
            .client
            .with_retry("get_project", || {
                self.client.get_document(PROJECTS_COLLECTION, id.as_str())
            })
            .await?;

        doc.as_ref().map(document_to_project).transpose()
    }

    /// Projects owned by `user_id`, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> FirestoreResult<Vec<Project>> {
        let query = StructuredQuery::collection(PROJECTS_COLLECTION)
            .where_eq("userId", user_id.to_firestore_value())
            .order_by("createdAt", Direction::Descending);
        self.query(query).await
    }

    /// Every project, newest first.
    pub async fn list_all(&self) -> FirestoreResult<Vec<Project>> {
        let query = StructuredQuery::collection(PROJECTS_COLLECTION)
            .order_by("createdAt", Direction::Descending);
        self.query(query).await
    }

    pub async fn delete(&self, id: &ProjectId) -> FirestoreResult<()> {
        self.client
            .with_retry("delete_project", || {
                self.client.delete_document(PROJECTS_COLLECTION, id.as_str())
            })
            .await?;
        info!(project_id = %id, "Deleted project");
        Ok(())
    }

    async fn query(&self, query: StructuredQuery) -> FirestoreResult<Vec<Project>> {
        let docs = self
            .client
            .with_retry("list_projects", || self.client.run_query(query.clone()))
            .await?;

        docs.iter().map(document_to_project).collect()
    }
}

// =============================================================================
// Field mapping
// =============================================================================

fn project_to_fields(project: &Project) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    let mut put = |key: &str, value: Value| {
        fields.insert(key.to_string(), value);
    };

    put("userId", project.user_id.to_firestore_value());
    put("userEmail", project.user_email.to_firestore_value());
    put("imageUrl", project.image_url.to_firestore_value());
    put("videoUrl", project.video_url.to_firestore_value());
    put("prompt", project.prompt.to_firestore_value());
    put("resolution", project.resolution.as_str().to_firestore_value());
    put("musicTrack", project.music_track.to_firestore_value());
    put("tags", project.tags.to_firestore_value());
    put("createdAt", project.created_at.to_firestore_value());

    let optional = [
        ("userName", project.user_name.as_deref()),
        ("userPhoto", project.user_photo.as_deref()),
        ("imagePath", project.image_path.as_deref()),
        ("videoPath", project.video_path.as_deref()),
        ("description", project.description.as_deref()),
        ("thumbnailUrl", project.thumbnail_url.as_deref()),
        ("thumbnailPath", project.thumbnail_path.as_deref()),
        ("cameraMovement", project.camera_movement.map(|m| m.as_str())),
        ("movementSpeed", project.movement_speed.map(|s| s.as_str())),
        ("duration", project.duration.map(|d| d.as_str())),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            put(key, value.to_firestore_value());
        }
    }

    if let Some(intensity) = project.intensity {
        put("intensity", intensity.to_firestore_value());
    }
    if let Some(updated_at) = project.updated_at {
        put("updatedAt", updated_at.to_firestore_value());
    }

    fields
}

fn update_to_fields(update: &ProjectUpdate, now: DateTime<Utc>) -> HashMap<String, Value> {
    HashMap::from([
        ("description".to_string(), update.description.to_firestore_value()),
        ("tags".to_string(), update.tags.to_firestore_value()),
        ("updatedAt".to_string(), now.to_firestore_value()),
    ])
}

fn document_to_project(doc: &Document) -> FirestoreResult<Project> {
    let fields = doc
        .fields
        .as_ref()
        .ok_or_else(|| FirestoreError::invalid_response("Document has no fields"))?;

    let get_string = |key: &str| -> Option<String> {
        fields.get(key).and_then(String::from_firestore_value)
    };
    let get_time = |key: &str| -> Option<DateTime<Utc>> {
        fields.get(key).and_then(DateTime::<Utc>::from_firestore_value)
    };

    Ok(Project {
        id: doc.id().map(ProjectId::from),
        user_id: get_string("userId").unwrap_or_default(),
        user_email: get_string("userEmail").unwrap_or_default(),
        user_name: get_string("userName"),
        user_photo: get_string("userPhoto"),
        image_url: get_string("imageUrl").unwrap_or_default(),
        video_url: get_string("videoUrl").unwrap_or_default(),
        image_path: get_string("imagePath"),
        video_path: get_string("videoPath"),
        prompt: get_string("prompt").unwrap_or_default(),
        resolution: get_string("resolution")
            .and_then(|r| r.parse().ok())
            .unwrap_or_default(),
        music_track: get_string("musicTrack").unwrap_or_else(|| "None".to_string()),
        tags: fields
            .get("tags")
            .and_then(Vec::<String>::from_firestore_value)
            .unwrap_or_default(),
        description: get_string("description"),
        created_at: get_time("createdAt")
            .or_else(|| doc.create_time.as_deref().and_then(parse_rfc3339))
            .unwrap_or_else(Utc::now),
        updated_at: get_time("updatedAt"),
        thumbnail_url: get_string("thumbnailUrl"),
        thumbnail_path: get_string("thumbnailPath"),
        camera_movement: get_string("cameraMovement").and_then(|m| m.parse().ok()),
        movement_speed: get_string("movementSpeed").and_then(|s| s.parse().ok()),
        duration: get_string("duration").and_then(|d| d.parse().ok()),
        intensity: fields.get("intensity").and_then(u8::from_firestore_value),
    })
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.into())
}
