//! Generation orchestrator.
//!
//! Owns one image-to-video request from validation to a playable file on
//! disk. Polling happens inside the [`VideoGenerator`]; the orchestrator
//! only guards against overlapping requests and writes the result.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mclip_models::{compose_prompt, image_mime_type, CameraConfig, VideoResolution};
use mclip_veo::{VeoError, VideoRequest};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{StudioError, StudioResult};
use crate::logging::GenerationLogger;
use crate::ports::VideoGenerator;

/// Inputs of one generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    pub image: Option<PathBuf>,
    pub prompt: String,
    pub resolution: VideoResolution,
    pub camera: Option<CameraConfig>,
}

/// A generated clip stored in the work directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoHandle {
    pub path: PathBuf,
    /// Name of the remote operation that produced the clip
    pub operation_name: String,
    /// Remote URI the clip was downloaded from
    pub source_uri: String,
}

/// Clears the in-flight flag when the request ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> StudioResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StudioError::GenerationInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct GenerationOrchestrator {
    generator: Option<Arc<dyn VideoGenerator>>,
    work_dir: PathBuf,
    in_flight: AtomicBool,
}

impl GenerationOrchestrator {
    /// `generator` is `None` when no API key is configured.
    pub fn new(generator: Option<Arc<dyn VideoGenerator>>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            work_dir: work_dir.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn set_generator(&mut self, generator: Arc<dyn VideoGenerator>) {
        self.generator = Some(generator);
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Check the inputs without contacting the service.
    pub fn validate(&self, input: &GenerationInput) -> StudioResult<()> {
        if input.image.is_none() {
            return Err(StudioError::MissingImage);
        }
        if input.prompt.trim().is_empty() {
            return Err(StudioError::MissingPrompt);
        }
        if let Some(camera) = &input.camera {
            camera.validate()?;
        }
        Ok(())
    }

    /// Generate a clip and write it to `{work_dir}/video_{uuid}.mp4`.
    pub async fn generate(&self, input: &GenerationInput) -> StudioResult<VideoHandle> {
        self.validate(input)?;
        let generator = self.generator.as_ref().ok_or(VeoError::MissingApiKey)?;
        let _in_flight = InFlight::acquire(&self.in_flight)?;

        let logger = GenerationLogger::generation(input.resolution, input.camera.as_ref());
        self.run(generator.as_ref(), input, &logger)
            .instrument(logger.span())
            .await
            .inspect_err(|e| logger.failed(e))
    }

    async fn run(
        &self,
        generator: &dyn VideoGenerator,
        input: &GenerationInput,
        logger: &GenerationLogger,
    ) -> StudioResult<VideoHandle> {
        let image = input.image.as_deref().ok_or(StudioError::MissingImage)?;
        let request = build_request(image, input).await?;
        logger.submitting(&request);

        let video = generator.generate(&request).await?;
        logger.operation_finished(&video.operation_name, video.bytes.len());

        tokio::fs::create_dir_all(&self.work_dir).await?;
        let path = self
            .work_dir
            .join(format!("video_{}.mp4", Uuid::new_v4().simple()));
        tokio::fs::write(&path, &video.bytes).await?;
        logger.clip_written(&path);

        Ok(VideoHandle {
            path,
            operation_name: video.operation_name,
            source_uri: video.uri,
        })
    }
}

/// Read and encode the image, and fold the camera directive into the prompt.
async fn build_request(image: &Path, input: &GenerationInput) -> StudioResult<VideoRequest> {
    let mime_type =
        image_mime_type(image).ok_or_else(|| StudioError::UnsupportedImage(image.to_path_buf()))?;
    let bytes = tokio::fs::read(image).await?;

    Ok(VideoRequest {
        prompt: compose_prompt(&input.prompt, input.camera.as_ref()),
        image_base64: STANDARD.encode(bytes),
        mime_type: mime_type.to_string(),
        resolution: input.resolution,
        duration: input.camera.map(|c| c.duration),
    })
}
