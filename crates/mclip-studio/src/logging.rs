//! Request-scoped logging for generation and save.
//!
//! Each request gets a span carrying its id and the parameters that matter
//! when reading logs later (resolution, camera, image type, Veo operation,
//! saved project id). Fields only known mid-request are recorded onto the
//! span as they arrive, so every later event carries them.

use std::time::Instant;

use mclip_models::{CameraConfig, ProjectId, VideoResolution};
use mclip_veo::VideoRequest;
use tracing::field::Empty;
use tracing::{error, info, warn, Span};
use uuid::Uuid;

use crate::error::StudioError;

/// What a studio request does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Generate,
    Save,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Generate => "generate",
            RequestKind::Save => "save",
        }
    }
}

/// Logger for one generation or save request.
#[derive(Debug, Clone)]
pub struct GenerationLogger {
    request_id: String,
    kind: RequestKind,
    started: Instant,
    span: Span,
}

impl GenerationLogger {
    /// Logger for a clip generation.
    pub fn generation(resolution: VideoResolution, camera: Option<&CameraConfig>) -> Self {
        let request_id = new_request_id();
        let camera = camera.map(|c| {
            format!(
                "{} {} {} {}/10",
                c.speed.as_str(),
                c.movement.as_str(),
                c.duration.as_str(),
                c.intensity
            )
        });
        let span = tracing::info_span!(
            "generation",
            request_id = %request_id,
            resolution = %resolution,
            camera = camera.as_deref().unwrap_or("none"),
            mime_type = Empty,
            operation_name = Empty,
        );
        Self::with_span(request_id, RequestKind::Generate, span)
    }

    /// Logger for saving a project owned by `user_id`.
    pub fn save(user_id: &str) -> Self {
        let request_id = new_request_id();
        let span = tracing::info_span!(
            "project_save",
            request_id = %request_id,
            user_id = %user_id,
            project_id = Empty,
        );
        Self::with_span(request_id, RequestKind::Save, span)
    }

    fn with_span(request_id: String, kind: RequestKind, span: Span) -> Self {
        Self {
            request_id,
            kind,
            started: Instant::now(),
            span,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Span to instrument the request future with.
    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// The encoded request is about to be submitted.
    pub fn submitting(&self, request: &VideoRequest) {
        self.span.record("mime_type", request.mime_type.as_str());
        info!(
            prompt_chars = request.prompt.chars().count(),
            image_bytes_b64 = request.image_base64.len(),
            duration = request.duration.map(|d| d.as_str()),
            "Submitting video generation"
        );
    }

    /// The Veo operation finished and its clip was downloaded.
    pub fn operation_finished(&self, operation_name: &str, size_bytes: usize) {
        self.span.record("operation_name", operation_name);
        info!(size_bytes, elapsed_ms = self.elapsed_ms(), "Generation finished");
    }

    pub fn asset_uploaded(&self, asset: &str, key: &str) {
        info!(asset, key, "Asset uploaded");
    }

    /// An optional step failed without failing the request.
    pub fn step_skipped(&self, step: &str, reason: &dyn std::fmt::Display) {
        warn!(step, reason = %reason, "Optional step skipped");
    }

    pub fn project_created(&self, id: &ProjectId) {
        self.span.record("project_id", id.as_str());
        info!(elapsed_ms = self.elapsed_ms(), "Project created");
    }

    pub fn clip_written(&self, path: &std::path::Path) {
        info!(
            path = %path.display(),
            elapsed_ms = self.elapsed_ms(),
            "Clip written"
        );
    }

    /// Log a failure inside the request span.
    pub fn failed(&self, err: &StudioError) {
        self.span.in_scope(|| {
            error!(
                kind = self.kind.as_str(),
                error = %err,
                requires_new_key = err.requires_new_key(),
                elapsed_ms = self.elapsed_ms(),
                "Request failed"
            );
        });
    }
}

fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()
}
