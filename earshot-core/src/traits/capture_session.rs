use crate::models::error::CaptureError;
use crate::models::recording_result::RecordingResult;
use crate::models::state::CaptureState;
use crate::models::stream_models::SessionDiagnostics;

/// Main capture session interface.
pub trait CaptureSession {
    /// Current session state.
    fn state(&self) -> CaptureState;

    fn diagnostics(&self) -> SessionDiagnostics;

    /// Start capture. Transitions: idle → capturing. No-op while capturing.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop capture and deliver the recording. Transitions: capturing → idle.
    ///
    /// Returns `None` when the session was already idle.
    fn stop(&mut self) -> Result<Option<RecordingResult>, CaptureError>;

    /// Start when idle, stop when capturing.
    fn toggle(&mut self) -> Result<(), CaptureError> {
        if self.state().is_capturing() {
            self.stop().map(|_| ())
        } else {
            self.start()
        }
    }
}
