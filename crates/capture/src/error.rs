/// Errors from the capture layer.
///
/// Both variants are recoverable in place: the operator grants the
/// permission / frees the device and retries `open`, or simply retries
/// the capture. Nothing here ever reaches the network layer.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Camera permission denied, no camera present, or hardware busy.
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// The device failed to deliver a frame.
    #[error("Frame capture failed: {0}")]
    Frame(String),
}
