use crate::models::error::CaptureError;
use crate::models::state::RecordingStatus;
use crate::models::stream_models::{ConsolidatedRecording, StreamChunk, StreamingSummary};

/// Transport to the host application.
///
/// Chunk callbacks fire from whichever thread the provider delivers segments
/// on. The session state is unlocked by then, but deliveries are serialized,
/// so a slow delegate holds back the next segment.
///
/// Per session the call order is:
/// ```text
/// on_status_changed(Recording)
/// on_chunk(0) .. on_chunk(n-1)      streaming only
/// on_recording
/// on_streaming_complete(n)          streaming only
/// on_status_changed(Stopped)
/// ```
pub trait CaptureDelegate: Send + Sync {
    fn on_status_changed(&self, status: RecordingStatus);

    /// Called when `start` fails on the environment or the device; the
    /// session stays idle. Only `EnvironmentUnsupported` and
    /// `DeviceAccessDenied` arrive here.
    fn on_error(&self, error: &CaptureError);

    fn on_chunk(&self, chunk: &StreamChunk);

    /// The full recording, exactly once per session.
    fn on_recording(&self, recording: &ConsolidatedRecording);

    fn on_streaming_complete(&self, summary: &StreamingSummary);
}
