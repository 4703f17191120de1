use thiserror::Error;

/// Why the capture environment cannot host a session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    #[error("microphone requires a secure context (HTTPS or localhost)")]
    NoSecureContext,

    #[error("microphone capture API is not available in this environment")]
    CaptureApiMissing,
}

/// Errors that can occur during capture operations.
///
/// Only `EnvironmentUnsupported` and `DeviceAccessDenied` are reported to the
/// host during `start`. A failed header extraction is not an error at all: it
/// switches the session to the fallback assembly policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("environment unsupported: {0}")]
    EnvironmentUnsupported(UnsupportedReason),

    #[error("device access denied: {0}")]
    DeviceAccessDenied(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl CaptureError {
    /// Stable name of the error kind, as reported to the host.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EnvironmentUnsupported(_) => "EnvironmentUnsupported",
            Self::DeviceAccessDenied(_) => "DeviceAccessDenied",
            Self::ConfigurationFailed(_) => "ConfigurationFailed",
            Self::EncodingFailed(_) => "EncodingFailed",
            Self::StorageError(_) => "StorageError",
            Self::Unknown(_) => "Unknown",
        }
    }
}
