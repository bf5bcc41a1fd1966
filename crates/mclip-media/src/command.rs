//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};
use crate::progress::{parse_progress_line, FfmpegProgress};

/// Lines of stderr kept for error reports.
const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
struct Input {
    /// Arguments placed before this input's `-i`
    args: Vec<String>,
    path: PathBuf,
}

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    inputs: Vec<Input>,
    output: PathBuf,
    /// Output arguments (after the last -i)
    output_args: Vec<String>,
    overwrite: bool,
    log_level: String,
}

impl FfmpegCommand {
    /// Create a command reading one input.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            inputs: vec![Input {
                args: Vec::new(),
                path: input.as_ref().to_path_buf(),
            }],
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add another input. Later `input_arg` calls apply to it.
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.inputs.push(Input {
            args: Vec::new(),
            path: path.as_ref().to_path_buf(),
        });
        self
    }

    /// Add an argument placed before the most recently added input.
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        if let Some(input) = self.inputs.last_mut() {
            input.args.push(arg.into());
        }
        self
    }

    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Seek the most recent input.
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Loop the most recent input forever.
    pub fn loop_input(self) -> Self {
        self.input_arg("-stream_loop").input_arg("-1")
    }

    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Map a stream specifier or filter label to the output.
    pub fn map(self, spec: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(spec)
    }

    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Stop when the shortest stream ends.
    pub fn shortest(self) -> Self {
        self.output_arg("-shortest")
    }

    /// Extract a single frame.
    pub fn single_frame(self) -> Self {
        self.output_arg("-frames:v").output_arg("1")
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        // Progress output to stderr
        args.push("-progress".to_string());
        args.push("pipe:2".to_string());

        for input in &self.inputs {
            args.extend(input.args.iter().cloned());
            args.push("-i".to_string());
            args.push(input.path.to_string_lossy().to_string());
        }

        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with progress tracking and a timeout.
#[derive(Debug, Default)]
pub struct FfmpegRunner {
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        self.run_with_progress(cmd, |_| {}).await
    }

    /// Run an FFmpeg command, reporting each progress block.
    pub async fn run_with_progress<F>(&self, cmd: &FfmpegCommand, progress_callback: F) -> MediaResult<()>
    where
        F: Fn(FfmpegProgress) + Send + 'static,
    {
        check_ffmpeg()?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::ffmpeg_failed("stderr not captured", None, None))?;

        // Progress lines are folded; everything else is kept as diagnostics.
        let reader_handle = tokio::spawn(async move {
            let mut reader = BufReader::new(stderr).lines();
            let mut current = FfmpegProgress::default();
            let mut tail: Vec<String> = Vec::new();

            while let Ok(Some(line)) = reader.next_line().await {
                if let Some(progress) = parse_progress_line(&line, &mut current) {
                    progress_callback(progress);
                } else if !line.contains('=') {
                    tail.push(line);
                    if tail.len() > STDERR_TAIL_LINES {
                        tail.remove(0);
                    }
                }
            }
            tail.join("\n")
        });

        let result = self.wait_for_completion(&mut child).await;
        let stderr_tail = reader_handle.await.unwrap_or_default();

        match result {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                (!stderr_tail.is_empty()).then_some(stderr_tail),
                status.code(),
            )),
            Err(e) => Err(e),
        }
    }

    /// Wait for the child, killing it when the timeout elapses.
    async fn wait_for_completion(&self, child: &mut Child) -> MediaResult<ExitStatus> {
        let Some(secs) = self.timeout_secs else {
            return Ok(child.wait().await?);
        };

        match tokio::time::timeout(Duration::from_secs(secs), child.wait()).await {
            Ok(status) => Ok(status?),
            Err(_) => {
                warn!("FFmpeg timed out after {} seconds, killing process", secs);
                let _ = child.kill().await;
                Err(MediaError::Timeout(secs))
            }
        }
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}
