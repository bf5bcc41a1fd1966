//! Thumbnail generation.

use std::path::Path;

use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Offset of the captured frame, in seconds.
pub const THUMBNAIL_TIMESTAMP: f64 = 1.0;
/// Width of the thumbnail; height keeps the aspect ratio.
pub const THUMBNAIL_SCALE_WIDTH: u32 = 480;

fn thumbnail_command(video_path: &Path, output_path: &Path) -> FfmpegCommand {
    FfmpegCommand::new(video_path, output_path)
        .seek(THUMBNAIL_TIMESTAMP)
        .single_frame()
        .video_filter(format!("scale={}:-2", THUMBNAIL_SCALE_WIDTH))
        .output_args(["-q:v", "3"])
}

/// Generate a JPEG thumbnail from a video file.
pub async fn generate_thumbnail(
    video_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> MediaResult<()> {
    let cmd = thumbnail_command(video_path.as_ref(), output_path.as_ref());
    debug!(output = %output_path.as_ref().display(), "Generating thumbnail");
    FfmpegRunner::new().with_timeout(60).run(&cmd).await
}
