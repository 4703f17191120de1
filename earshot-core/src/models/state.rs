/// Capture session state machine.
///
/// ```text
/// idle ──start──▶ capturing ──stop──▶ idle
/// ```
///
/// `start` while capturing and `stop` while idle are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Capturing {
        /// Streaming mode captured at `start`, fixed until `stop`.
        streaming: bool,
    },
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing { .. })
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Capturing { streaming: true })
    }
}

/// Status values reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    Recording,
    Stopped,
}

impl RecordingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recording => "recording",
            Self::Stopped => "stopped",
        }
    }
}
