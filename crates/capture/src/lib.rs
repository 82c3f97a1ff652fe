//! Camera lifecycle management for the capture pipeline.
//!
//! [`device::CaptureDevice`] owns the state machine around a
//! [`source::FrameSource`] -- the capability-scoped media-device seam.
//! [`ffmpeg::FfmpegSource`] backs the seam with an ffmpeg single-frame
//! grab against a V4L2 device (or any input ffmpeg understands); tests
//! back it with in-memory fakes.

pub mod device;
pub mod error;
pub mod ffmpeg;
pub mod source;
