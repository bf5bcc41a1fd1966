//! Background music overlay.

use std::path::Path;

use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;

/// Default level of the music track.
pub const DEFAULT_MUSIC_VOLUME: f32 = 0.3;
/// Default level of the clip's own audio.
pub const DEFAULT_VIDEO_VOLUME: f32 = 0.7;

/// Relative levels of the two audio sources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicMix {
    pub music_volume: f32,
    pub video_volume: f32,
}

impl Default for MusicMix {
    fn default() -> Self {
        Self {
            music_volume: DEFAULT_MUSIC_VOLUME,
            video_volume: DEFAULT_VIDEO_VOLUME,
        }
    }
}

impl MusicMix {
    pub fn with_music_volume(mut self, volume: f32) -> Self {
        self.music_volume = volume;
        self
    }

    pub fn validate(&self) -> MediaResult<()> {
        for volume in [self.music_volume, self.video_volume] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(MediaError::InvalidVolume(volume));
            }
        }
        Ok(())
    }

    /// Filter graph producing `[aout]`.
    ///
    /// Input 0 is the clip, input 1 the looped music.
    fn filter_graph(&self, clip_has_audio: bool) -> String {
        if clip_has_audio {
            format!(
                "[0:a]volume={:.2}[orig];[1:a]volume={:.2}[music];\
                 [orig][music]amix=inputs=2:duration=first:dropout_transition=0:normalize=0[aout]",
                self.video_volume, self.music_volume
            )
        } else {
            format!("[1:a]volume={:.2}[aout]", self.music_volume)
        }
    }
}

fn overlay_command(
    video_path: &Path,
    music_source: &str,
    output_path: &Path,
    mix: &MusicMix,
    clip_has_audio: bool,
) -> FfmpegCommand {
    FfmpegCommand::new(video_path, output_path)
        .input(music_source)
        .loop_input()
        .filter_complex(mix.filter_graph(clip_has_audio))
        .map("0:v")
        .map("[aout]")
        .video_codec("copy")
        .audio_codec("aac")
        .audio_bitrate("192k")
        .shortest()
        .output_args(["-movflags", "+faststart"])
}

/// Mix a looped music track under a clip.
///
/// `music_source` may be a local path or an http(s) URL. The video stream is
/// copied and the output stops when the clip ends.
pub async fn overlay_music(
    video_path: impl AsRef<Path>,
    music_source: &str,
    output_path: impl AsRef<Path>,
    mix: MusicMix,
) -> MediaResult<()> {
    let video_path = video_path.as_ref();
    let output_path = output_path.as_ref();
    mix.validate()?;

    let info = probe_video(video_path).await?;
    let cmd = overlay_command(video_path, music_source, output_path, &mix, info.has_audio);

    info!(
        video = %video_path.display(),
        music = %music_source,
        music_volume = mix.music_volume,
        clip_has_audio = info.has_audio,
        "Overlaying music"
    );

    let timeout = (info.duration.ceil() as u64).saturating_mul(10).max(120);
    let duration_ms = (info.duration * 1000.0) as i64;
    FfmpegRunner::new()
        .with_timeout(timeout)
        .run_with_progress(&cmd, move |progress| {
            debug!(
                percent = progress.percentage(duration_ms),
                speed = progress.speed,
                done = progress.is_complete,
                "Music overlay progress"
            );
        })
        .await
}
