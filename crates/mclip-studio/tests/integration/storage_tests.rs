//! Blob storage integration tests.

use std::io::Write;

/// Bucket is reachable with the configured credentials.
#[tokio::test]
#[ignore = "requires storage credentials"]
async fn test_storage_connection() {
    dotenvy::dotenv().ok();

    let client = mclip_storage::BlobClient::from_env()
        .await
        .expect("Failed to create blob client");

    client
        .check_connectivity()
        .await
        .expect("Failed to check storage connectivity");
}

/// Upload, read back and delete a project video.
#[tokio::test]
#[ignore = "requires storage credentials"]
async fn test_project_video_cycle() {
    dotenvy::dotenv().ok();

    let client = mclip_storage::BlobClient::from_env()
        .await
        .expect("Failed to create blob client");

    let mut file = tempfile::Builder::new()
        .suffix(".mp4")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(b"integration test clip").unwrap();

    let asset = client
        .upload_project_video("integration_user", file.path())
        .await
        .expect("Failed to upload video");
    assert!(asset.key.starts_with("users/integration_user/videos/"));
    assert!(asset.url.starts_with("http"));

    assert!(client.exists(&asset.key).await.unwrap());
    let bytes = client.download_bytes(&asset.key).await.unwrap();
    assert_eq!(bytes, b"integration test clip");

    client.delete_object(&asset.key).await.unwrap();
    assert!(!client.exists(&asset.key).await.unwrap());
}
