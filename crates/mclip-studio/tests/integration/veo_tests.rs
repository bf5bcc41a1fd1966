//! Veo integration tests. These consume generation quota.

use mclip_models::VideoResolution;
use mclip_studio::{GenerationInput, GenerationOrchestrator};
use mclip_veo::VeoClient;
use std::sync::Arc;

/// 1x1 transparent PNG.
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

#[tokio::test]
#[ignore = "requires a Gemini API key with Veo access"]
async fn test_generate_clip() {
    dotenvy::dotenv().ok();

    let client = VeoClient::from_env().expect("Failed to create Veo client");
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("pixel.png");
    std::fs::write(&image, PIXEL_PNG).unwrap();

    let orchestrator = GenerationOrchestrator::new(Some(Arc::new(client)), dir.path());
    let input = GenerationInput {
        image: Some(image),
        prompt: "A soft glow slowly fills the frame".into(),
        resolution: VideoResolution::P720,
        camera: None,
    };

    let handle = orchestrator.generate(&input).await.expect("Generation failed");
    let size = std::fs::metadata(&handle.path).unwrap().len();
    assert!(size > 0);
    println!("Generated {} ({} bytes)", handle.path.display(), size);
}
