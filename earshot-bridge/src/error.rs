use thiserror::Error;

/// Failures on the host side of the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("event channel write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("event serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}
