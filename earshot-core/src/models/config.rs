use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Deserialize;

/// Default encoder cadence in streaming mode.
pub const DEFAULT_TIMESLICE_MS: u64 = 3000;

/// Default container content type.
pub const DEFAULT_MIME_TYPE: &str = "audio/webm";

/// Configuration for a capture session.
///
/// Hosts may load it from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureConfiguration {
    /// Deliver a self-contained chunk per encoder segment (default: false).
    pub streaming_enabled: bool,

    /// Encoder cadence in milliseconds when streaming (default: 3000).
    pub timeslice_ms: u64,

    /// Content type attached to every delivery (default: `audio/webm`).
    pub mime_type: String,

    /// When set, the consolidated recording is also written here on stop.
    pub archive_directory: Option<PathBuf>,
}

impl CaptureConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.timeslice_ms == 0 {
            return Err("timeslice must be positive".into());
        }
        if self.mime_type.trim().is_empty() {
            return Err("mime type must not be empty".into());
        }
        Ok(())
    }

    pub fn timeslice(&self) -> Duration {
        Duration::from_millis(self.timeslice_ms)
    }

    /// Encoder cadence for this configuration: `None` means a single
    /// segment at stop.
    pub fn cadence(&self) -> Option<Duration> {
        self.streaming_enabled.then(|| self.timeslice())
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            streaming_enabled: false,
            timeslice_ms: DEFAULT_TIMESLICE_MS,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            archive_directory: None,
        }
    }
}

/// Configuration owned by the host and read by the session at `start`.
///
/// Edits made while a session is capturing apply to the next session only.
#[derive(Debug, Clone, Default)]
pub struct SharedConfiguration {
    inner: Arc<RwLock<CaptureConfiguration>>,
}

impl SharedConfiguration {
    pub fn new(config: CaptureConfiguration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn snapshot(&self) -> CaptureConfiguration {
        self.inner.read().clone()
    }

    pub fn set_streaming_enabled(&self, enabled: bool) {
        self.inner.write().streaming_enabled = enabled;
    }

    pub fn update(&self, f: impl FnOnce(&mut CaptureConfiguration)) {
        f(&mut self.inner.write());
    }
}
