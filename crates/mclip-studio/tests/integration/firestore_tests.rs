//! Firestore integration tests.

use mclip_firestore::{FirestoreClient, ProjectRepository};
use mclip_models::{Project, ProjectUpdate, UserProfile};

/// Create, read, update, list and delete a project record.
#[tokio::test]
#[ignore = "requires Firestore credentials"]
async fn test_project_repository_cycle() {
    dotenvy::dotenv().ok();

    let client = FirestoreClient::from_env()
        .await
        .expect("Failed to create Firestore client");
    let repo = ProjectRepository::new(client);

    let owner = UserProfile::new("integration_user", "integration@example.com");
    let project = Project::new(
        &owner,
        "https://example.com/image.png",
        "https://example.com/video.mp4",
        "Integration test prompt",
    );

    let id = repo.create(&project).await.expect("Failed to create project");

    let fetched = repo.get(&id).await.unwrap().expect("Project should exist");
    assert_eq!(fetched.prompt, "Integration test prompt");
    assert_eq!(fetched.user_id, "integration_user");

    let update = ProjectUpdate {
        description: "updated".into(),
        tags: vec!["integration".into()],
    };
    repo.update(&id, &update).await.expect("Failed to update project");

    let mine = repo.list_for_user("integration_user").await.unwrap();
    let listed = mine.iter().find(|p| p.id.as_ref() == Some(&id)).expect("Project listed");
    assert_eq!(listed.tags, vec!["integration".to_string()]);

    repo.delete(&id).await.expect("Failed to delete project");
    assert!(repo.get(&id).await.unwrap().is_none());
}
