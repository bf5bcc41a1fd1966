//! FFmpeg progress parsing.

use serde::{Deserialize, Serialize};

/// Progress information from FFmpeg.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FfmpegProgress {
    /// Current frame number
    pub frame: u64,
    pub fps: f64,
    /// Output time in milliseconds
    pub out_time_ms: i64,
    /// Encoding speed (1.5 = 1.5x realtime)
    pub speed: f64,
    pub is_complete: bool,
}

impl FfmpegProgress {
    /// Progress percentage given the total duration in milliseconds.
    pub fn percentage(&self, total_duration_ms: i64) -> f64 {
        if total_duration_ms <= 0 {
            return 0.0;
        }
        ((self.out_time_ms as f64 / total_duration_ms as f64) * 100.0).min(100.0)
    }
}

/// Fold one `key=value` line of `-progress` output into `current`.
///
/// Returns a snapshot at the end of each progress block.
pub(crate) fn parse_progress_line(line: &str, current: &mut FfmpegProgress) -> Option<FfmpegProgress> {
    let (key, value) = line.trim().split_once('=')?;

    match key {
        "out_time_us" => {
            if let Ok(us) = value.parse::<i64>() {
                current.out_time_ms = us / 1000;
            }
        }
        // Despite the name, ffmpeg reports microseconds here too.
        "out_time_ms" => {
            if let Ok(us) = value.parse::<i64>() {
                current.out_time_ms = us / 1000;
            }
        }
        "frame" => {
            if let Ok(frame) = value.parse() {
                current.frame = frame;
            }
        }
        "fps" => {
            if let Ok(fps) = value.parse() {
                current.fps = fps;
            }
        }
        "speed" => {
            if let Some(speed) = value.strip_suffix('x').and_then(|s| s.trim().parse().ok()) {
                current.speed = speed;
            }
        }
        "progress" => {
            if value == "end" {
                current.is_complete = true;
            }
            return Some(current.clone());
        }
        _ => {}
    }

    None
}
