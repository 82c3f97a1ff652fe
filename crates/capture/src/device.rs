//! The capture device state machine.

use tokio_util::sync::CancellationToken;

use fieldtask_core::task::ImageBuffer;

use crate::error::CaptureError;
use crate::source::FrameSource;

/// Lifecycle state of a [`CaptureDevice`].
///
/// `Idle -> Requesting -> Ready -> Closed`, with `Error` reachable from
/// `Requesting`. The capture pass itself is transient: a grab leaves
/// and re-enters `Ready` within one call, so it is never observable as
/// a stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// No access requested yet.
    Idle,
    /// Waiting for the device to signal readiness.
    Requesting,
    /// Holding the stream; frames can be captured.
    Ready,
    /// Hardware released. Terminal until the next `open`.
    Closed,
    /// The last `open` failed; the operator may retry.
    Error,
}

/// Owns the lifecycle of the physical camera stream.
///
/// Exactly one device owns the stream per open session; only this type
/// starts or stops it. `close` must run on every exit path (teardown,
/// navigation away, explicit cancel) -- it is idempotent, and its
/// cancellation token also unwinds an `open` that has not resolved yet.
pub struct CaptureDevice<S: FrameSource> {
    source: S,
    state: DeviceState,
    cancel: CancellationToken,
}

impl<S: FrameSource> CaptureDevice<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: DeviceState::Idle,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// A handle a teardown path can trigger to abort a pending `open`
    /// (and any future one) without holding the device itself.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Request exclusive access to the camera.
    ///
    /// Transitions to `Requesting`, then to `Ready` once the source
    /// signals readiness. On failure the device enters `Error` and the
    /// caller gets [`CaptureError::DeviceUnavailable`] to surface;
    /// `open` may be retried from there. If the cancellation token
    /// fires while the request is pending, the source is released, the
    /// device closes, and the aborted request reports the camera as
    /// unavailable.
    pub async fn open(&mut self) -> Result<(), CaptureError> {
        if self.state == DeviceState::Ready {
            return Ok(());
        }

        // A device cancelled in a previous session gets a fresh token,
        // otherwise open() would abort immediately on reopen.
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }

        self.state = DeviceState::Requesting;
        tracing::debug!("Requesting camera access");

        let cancel = self.cancel.clone();
        let outcome = tokio::select! {
            _ = cancel.cancelled() => None,
            result = self.source.open() => Some(result),
        };

        match outcome {
            None => {
                // The pending source.open() future was dropped; release
                // whatever it may have acquired.
                self.source.close().await;
                self.state = DeviceState::Closed;
                tracing::info!("Camera open cancelled by teardown");
                Err(CaptureError::DeviceUnavailable(
                    "capture cancelled before the camera became ready".to_string(),
                ))
            }
            Some(Ok(())) => {
                self.state = DeviceState::Ready;
                tracing::info!("Camera ready");
                Ok(())
            }
            Some(Err(e)) => {
                self.state = DeviceState::Error;
                tracing::warn!(error = %e, "Camera access failed");
                Err(e)
            }
        }
    }

    /// Capture one still frame into the draft's buffer.
    ///
    /// Returns the assigned ordinal on success. Has no observable
    /// effect -- `Ok(None)`, buffer untouched -- when the device is not
    /// `Ready` or the buffer is already at capacity. A genuine device
    /// read failure is returned as an error with the device staying
    /// `Ready`, so the operator can simply retry.
    pub async fn capture_into(
        &mut self,
        buffer: &mut ImageBuffer,
    ) -> Result<Option<usize>, CaptureError> {
        if self.state != DeviceState::Ready {
            tracing::debug!(state = ?self.state, "Capture ignored: device not ready");
            return Ok(None);
        }
        if buffer.is_full() {
            tracing::debug!("Capture ignored: image buffer full");
            return Ok(None);
        }

        let frame = self.source.grab_frame().await?;
        let ordinal = buffer.append(frame);
        tracing::debug!(ordinal = ?ordinal, count = buffer.len(), "Frame captured");
        Ok(ordinal)
    }

    /// Release all underlying hardware resources.
    ///
    /// Valid (and idempotent) from any state; also fires the
    /// cancellation token so a concurrently pending `open` unwinds.
    pub async fn close(&mut self) {
        self.cancel.cancel();
        self.source.close().await;
        if self.state != DeviceState::Closed {
            tracing::info!(from = ?self.state, "Camera closed");
        }
        self.state = DeviceState::Closed;
    }
}
