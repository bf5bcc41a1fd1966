//! FFmpeg CLI wrapper for video post-processing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with multiple inputs
//! - Progress parsing from `-progress pipe:2`
//! - Cancellation and timeouts via tokio
//! - Probing, thumbnails and background music overlays

pub mod command;
pub mod error;
pub mod music;
pub mod probe;
pub mod progress;
pub mod thumbnail;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use music::{overlay_music, MusicMix, DEFAULT_MUSIC_VOLUME, DEFAULT_VIDEO_VOLUME};
pub use probe::{probe_video, VideoInfo};
pub use progress::FfmpegProgress;
pub use thumbnail::generate_thumbnail;
