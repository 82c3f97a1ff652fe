//! ffmpeg-backed frame source.
//!
//! Grabs single JPEG stills by spawning `ffmpeg` against a V4L2 device
//! (or any input URL ffmpeg understands). Every grab is its own
//! short-lived process with `kill_on_drop(true)`, so a timeout or a
//! dropped future always releases the device -- no zombie ffmpeg
//! processes accumulate when a camera stops responding.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::CaptureError;
use crate::source::FrameSource;

/// Default hard timeout for one ffmpeg invocation.
const DEFAULT_GRAB_TIMEOUT: Duration = Duration::from_secs(10);

/// A [`FrameSource`] that shells out to ffmpeg for each frame.
///
/// `open` verifies the ffmpeg binary is present and probes the device
/// once (the readiness signal); the V4L2 device itself is only held for
/// the duration of each grab.
pub struct FfmpegSource {
    input: String,
    /// `-f` demuxer hint, e.g. `v4l2` for `/dev/video*` devices. `None`
    /// lets ffmpeg infer the format (file and URL inputs).
    input_format: Option<&'static str>,
    timeout: Duration,
    opened: bool,
}

impl FfmpegSource {
    /// Source for a capture input. Paths under `/dev/` are treated as
    /// V4L2 devices; anything else (a file, an RTSP URL) is passed to
    /// ffmpeg as-is.
    pub fn new(input: impl Into<String>) -> Self {
        let input = input.into();
        let input_format = input.starts_with("/dev/").then_some("v4l2");
        Self {
            input,
            input_format,
            timeout: DEFAULT_GRAB_TIMEOUT,
            opened: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that the ffmpeg binary is available on this host.
    pub async fn check_ffmpeg() -> Result<String, CaptureError> {
        let output = Command::new("ffmpeg")
            .arg("-version")
            .output()
            .await
            .map_err(|e| CaptureError::DeviceUnavailable(format!("ffmpeg not found: {e}")))?;

        if !output.status.success() {
            return Err(CaptureError::DeviceUnavailable(
                "ffmpeg version check failed".to_string(),
            ));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        Ok(version.lines().next().unwrap_or("unknown").to_string())
    }

    /// Spawn one ffmpeg invocation that writes a single MJPEG frame to
    /// stdout, with a hard timeout. The `Child` is killed on drop, so a
    /// timeout cannot leak a process holding the device.
    async fn grab_once(&self) -> Result<Vec<u8>, CaptureError> {
        let mut cmd = Command::new("ffmpeg");
        if let Some(format) = self.input_format {
            cmd.args(["-f", format]);
        }
        cmd.args(["-i", &self.input])
            .args(["-frames:v", "1"])
            .args(["-f", "image2pipe", "-vcodec", "mjpeg"])
            .args(["-loglevel", "error", "-y", "-"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| CaptureError::DeviceUnavailable(format!("ffmpeg spawn failed: {e}")))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(CaptureError::Frame(format!("ffmpeg execution failed: {e}")));
            }
            Err(_) => {
                tracing::warn!(
                    input = %self.input,
                    timeout_secs = self.timeout.as_secs(),
                    "ffmpeg grab timed out, process killed"
                );
                return Err(CaptureError::Frame(format!(
                    "ffmpeg timeout ({}s)",
                    self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Permission and busy-device failures surface here rather
            // than at spawn time.
            return Err(CaptureError::DeviceUnavailable(format!(
                "ffmpeg failed: {}",
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            return Err(CaptureError::Frame("ffmpeg returned an empty frame".to_string()));
        }

        if !matches!(
            image::guess_format(&output.stdout),
            Ok(image::ImageFormat::Jpeg)
        ) {
            return Err(CaptureError::Frame(
                "ffmpeg output is not a JPEG frame".to_string(),
            ));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl FrameSource for FfmpegSource {
    /// Probe the input once. A successful probe is the readiness
    /// signal; a failed one reports the camera as unavailable (missing,
    /// busy, or permission denied).
    async fn open(&mut self) -> Result<(), CaptureError> {
        let version = Self::check_ffmpeg().await?;
        tracing::debug!(%version, input = %self.input, "Probing capture input");

        match self.grab_once().await {
            Ok(frame) => {
                tracing::info!(
                    input = %self.input,
                    probe_bytes = frame.len(),
                    "Capture input ready"
                );
                self.opened = true;
                Ok(())
            }
            Err(CaptureError::Frame(reason)) => {
                // A probe that cannot produce a frame means the device
                // is not usable, whatever the proximate cause.
                Err(CaptureError::DeviceUnavailable(reason))
            }
            Err(e) => Err(e),
        }
    }

    async fn grab_frame(&mut self) -> Result<Vec<u8>, CaptureError> {
        if !self.opened {
            return Err(CaptureError::Frame("source is not open".to_string()));
        }
        let frame = self.grab_once().await?;
        tracing::debug!(input = %self.input, size = frame.len(), "Frame grabbed");
        Ok(frame)
    }

    async fn close(&mut self) {
        // Each grab holds the device only for its own process lifetime,
        // so there is no persistent handle to release.
        self.opened = false;
    }
}
