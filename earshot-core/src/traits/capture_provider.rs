use std::sync::Arc;
use std::time::Duration;

use crate::models::error::CaptureError;

/// Callback invoked with the bytes of each encoder segment, in emission order.
pub type SegmentCallback = Arc<dyn Fn(Vec<u8>) + Send + Sync + 'static>;

/// A microphone plus the container encoder attached to it.
///
/// Implemented by:
/// - `ReplayProvider` (earshot-bridge), which plays back a recorded file
///
/// `acquire` and `finalize` are the two operations that may block on the
/// outside world; everything else returns immediately.
pub trait CaptureProvider: Send {
    /// Whether capture is allowed from this context (HTTPS or localhost).
    fn is_secure_context(&self) -> bool;

    /// Whether a capture API exists at all.
    fn is_capture_api_available(&self) -> bool;

    /// Acquire the capture device.
    ///
    /// Fails with `DeviceAccessDenied` carrying the underlying cause.
    fn acquire(&mut self) -> Result<(), CaptureError>;

    /// Start the encoder.
    ///
    /// With `Some(cadence)` a segment is delivered every `cadence`; with
    /// `None` nothing is delivered until `finalize`.
    fn start(&mut self, cadence: Option<Duration>, callback: SegmentCallback) -> Result<(), CaptureError>;

    /// Stop the encoder, returning any buffered final segment.
    ///
    /// No callback may fire after this returns.
    fn finalize(&mut self) -> Result<Option<Vec<u8>>, CaptureError>;

    /// Release the capture device. Must be safe to call in any state.
    fn release(&mut self);
}
