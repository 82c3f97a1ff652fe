//! Integration tests for the capture device state machine, backed by
//! scripted in-memory frame sources (no camera hardware in CI).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;

use fieldtask_capture::device::{CaptureDevice, DeviceState};
use fieldtask_capture::error::CaptureError;
use fieldtask_capture::source::FrameSource;
use fieldtask_core::task::{ImageBuffer, MAX_IMAGES};

/// A frame source driven by pre-scripted results, with shared counters
/// the test can observe after the device takes ownership.
struct ScriptedSource {
    open_results: VecDeque<Result<(), CaptureError>>,
    frames: VecDeque<Result<Vec<u8>, CaptureError>>,
    grab_calls: Arc<AtomicUsize>,
    close_calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn new(
        open_results: Vec<Result<(), CaptureError>>,
        frames: Vec<Result<Vec<u8>, CaptureError>>,
    ) -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let grab_calls = Arc::new(AtomicUsize::new(0));
        let close_calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            open_results: open_results.into(),
            frames: frames.into(),
            grab_calls: grab_calls.clone(),
            close_calls: close_calls.clone(),
        };
        (source, grab_calls, close_calls)
    }
}

#[async_trait]
impl FrameSource for ScriptedSource {
    async fn open(&mut self) -> Result<(), CaptureError> {
        self.open_results.pop_front().unwrap_or(Ok(()))
    }

    async fn grab_frame(&mut self) -> Result<Vec<u8>, CaptureError> {
        self.grab_calls.fetch_add(1, Ordering::SeqCst);
        self.frames
            .pop_front()
            .unwrap_or_else(|| Err(CaptureError::Frame("script exhausted".into())))
    }

    async fn close(&mut self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// A source whose `open` never resolves, for cancellation tests.
struct NeverReadySource {
    close_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl FrameSource for NeverReadySource {
    async fn open(&mut self) -> Result<(), CaptureError> {
        std::future::pending().await
    }

    async fn grab_frame(&mut self) -> Result<Vec<u8>, CaptureError> {
        Err(CaptureError::Frame("never ready".into()))
    }

    async fn close(&mut self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn jpeg_bytes(marker: u8) -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, marker]
}

// ---------------------------------------------------------------------------
// Test: open transitions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn open_success_reaches_ready() {
    let (source, _, _) = ScriptedSource::new(vec![Ok(())], vec![]);
    let mut device = CaptureDevice::new(source);
    assert_eq!(device.state(), DeviceState::Idle);

    device.open().await.expect("open should succeed");
    assert_eq!(device.state(), DeviceState::Ready);
}

/// A failed open enters `Error`; a retried open may then succeed.
#[tokio::test]
async fn open_failure_enters_error_and_allows_retry() {
    let (source, _, _) = ScriptedSource::new(
        vec![
            Err(CaptureError::DeviceUnavailable("permission denied".into())),
            Ok(()),
        ],
        vec![],
    );
    let mut device = CaptureDevice::new(source);

    let err = device.open().await.expect_err("first open should fail");
    assert_matches!(err, CaptureError::DeviceUnavailable(_));
    assert_eq!(device.state(), DeviceState::Error);

    device.open().await.expect("retried open should succeed");
    assert_eq!(device.state(), DeviceState::Ready);
}

// ---------------------------------------------------------------------------
// Test: capture semantics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn capture_appends_frames_in_order() {
    let (source, _, _) = ScriptedSource::new(
        vec![Ok(())],
        vec![Ok(jpeg_bytes(1)), Ok(jpeg_bytes(2))],
    );
    let mut device = CaptureDevice::new(source);
    let mut buffer = ImageBuffer::new();

    device.open().await.expect("open should succeed");
    let first = device
        .capture_into(&mut buffer)
        .await
        .expect("capture should succeed");
    let second = device
        .capture_into(&mut buffer)
        .await
        .expect("capture should succeed");

    assert_eq!(first, Some(0));
    assert_eq!(second, Some(1));
    assert_eq!(buffer.len(), 2);
    assert_eq!(buffer.frames()[0].data, jpeg_bytes(1));
    assert_eq!(buffer.frames()[1].data, jpeg_bytes(2));
    // The device re-enters Ready immediately after each capture.
    assert_eq!(device.state(), DeviceState::Ready);
}

/// Capturing while not `Ready` never touches the source or the buffer.
#[tokio::test]
async fn capture_before_open_has_no_effect() {
    let (source, grab_calls, _) = ScriptedSource::new(vec![], vec![Ok(jpeg_bytes(1))]);
    let mut device = CaptureDevice::new(source);
    let mut buffer = ImageBuffer::new();

    let outcome = device
        .capture_into(&mut buffer)
        .await
        .expect("a not-ready capture is not an error");

    assert_eq!(outcome, None);
    assert_eq!(buffer.len(), 0);
    assert_eq!(grab_calls.load(Ordering::SeqCst), 0);
}

/// Capturing into a full buffer never touches the source or the buffer.
#[tokio::test]
async fn capture_into_full_buffer_has_no_effect() {
    let (source, grab_calls, _) = ScriptedSource::new(vec![Ok(())], vec![Ok(jpeg_bytes(1))]);
    let mut device = CaptureDevice::new(source);

    let mut buffer = ImageBuffer::new();
    for i in 0..MAX_IMAGES {
        buffer.append(jpeg_bytes(i as u8));
    }

    device.open().await.expect("open should succeed");
    let outcome = device
        .capture_into(&mut buffer)
        .await
        .expect("a full-buffer capture is not an error");

    assert_eq!(outcome, None);
    assert_eq!(buffer.len(), MAX_IMAGES);
    assert_eq!(grab_calls.load(Ordering::SeqCst), 0);
}

/// A device read failure surfaces as an error but leaves the device
/// `Ready` (the operator retries) and the buffer untouched.
#[tokio::test]
async fn frame_error_keeps_device_ready() {
    let (source, _, _) = ScriptedSource::new(
        vec![Ok(())],
        vec![
            Err(CaptureError::Frame("sensor glitch".into())),
            Ok(jpeg_bytes(7)),
        ],
    );
    let mut device = CaptureDevice::new(source);
    let mut buffer = ImageBuffer::new();

    device.open().await.expect("open should succeed");
    let err = device
        .capture_into(&mut buffer)
        .await
        .expect_err("glitched grab should error");
    assert_matches!(err, CaptureError::Frame(_));
    assert_eq!(device.state(), DeviceState::Ready);
    assert_eq!(buffer.len(), 0);

    // Retry works without reopening.
    let retried = device
        .capture_into(&mut buffer)
        .await
        .expect("retried capture should succeed");
    assert_eq!(retried, Some(0));
}

// ---------------------------------------------------------------------------
// Test: close and cancellation
// ---------------------------------------------------------------------------

/// `close` releases the source from any state and is idempotent.
#[tokio::test]
async fn close_is_idempotent_from_any_state() {
    let (source, _, close_calls) = ScriptedSource::new(vec![Ok(())], vec![]);
    let mut device = CaptureDevice::new(source);

    // Close straight from Idle.
    device.close().await;
    assert_eq!(device.state(), DeviceState::Closed);

    // And again: still fine, source released each time.
    device.close().await;
    assert_eq!(device.state(), DeviceState::Closed);
    assert_eq!(close_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn capture_after_close_has_no_effect() {
    let (source, grab_calls, _) = ScriptedSource::new(vec![Ok(())], vec![Ok(jpeg_bytes(1))]);
    let mut device = CaptureDevice::new(source);
    let mut buffer = ImageBuffer::new();

    device.open().await.expect("open should succeed");
    device.close().await;

    let outcome = device
        .capture_into(&mut buffer)
        .await
        .expect("a closed-device capture is not an error");
    assert_eq!(outcome, None);
    assert_eq!(grab_calls.load(Ordering::SeqCst), 0);
}

/// Triggering the cancellation token while `open` is still pending
/// releases the camera and resolves the open with the device closed.
#[tokio::test]
async fn cancel_during_open_releases_the_source() {
    let close_calls = Arc::new(AtomicUsize::new(0));
    let mut device = CaptureDevice::new(NeverReadySource {
        close_calls: close_calls.clone(),
    });

    let cancel = device.cancel_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
    });

    let err = device
        .open()
        .await
        .expect_err("cancelled open should not report ready");
    assert_matches!(err, CaptureError::DeviceUnavailable(_));
    assert_eq!(device.state(), DeviceState::Closed);
    assert_eq!(close_calls.load(Ordering::SeqCst), 1);
}

/// A device cancelled in one session can be reopened for the next.
#[tokio::test]
async fn reopen_after_close_works() {
    let (source, _, _) = ScriptedSource::new(vec![Ok(()), Ok(())], vec![Ok(jpeg_bytes(3))]);
    let mut device = CaptureDevice::new(source);
    let mut buffer = ImageBuffer::new();

    device.open().await.expect("first open should succeed");
    device.close().await;
    assert_eq!(device.state(), DeviceState::Closed);

    device.open().await.expect("reopen should succeed");
    assert_eq!(device.state(), DeviceState::Ready);
    let outcome = device
        .capture_into(&mut buffer)
        .await
        .expect("capture after reopen should succeed");
    assert_eq!(outcome, Some(0));
}
