//! The media-device seam.

use async_trait::async_trait;

use crate::error::CaptureError;

/// A capability-scoped still-frame source.
///
/// Implementations wrap whatever device API the target platform
/// provides (see [`crate::ffmpeg::FfmpegSource`] for the V4L2/ffmpeg
/// backing). The contract mirrors the capture lifecycle:
///
/// - [`open`](Self::open) requests exclusive access and resolves once
///   the device signals readiness;
/// - [`grab_frame`](Self::grab_frame) returns one JPEG still at the
///   device's native resolution, valid only between `open` and `close`;
/// - [`close`](Self::close) releases the underlying hardware and must
///   be idempotent.
#[async_trait]
pub trait FrameSource: Send {
    async fn open(&mut self) -> Result<(), CaptureError>;

    async fn grab_frame(&mut self) -> Result<Vec<u8>, CaptureError>;

    async fn close(&mut self);
}
