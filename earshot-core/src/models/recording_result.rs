use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Summary returned when a capture session stops.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    pub recording_id: String,
    pub mime_type: String,
    pub total_bytes: u64,
    pub segment_count: usize,
    /// Number of streamed chunks; `None` for batch sessions.
    pub chunk_count: Option<u64>,
    pub duration_secs: f64,
    /// SHA-256 of the consolidated recording, lowercase hex.
    pub checksum: String,
    /// Where the recording was archived, if an archive directory was configured.
    pub file_path: Option<PathBuf>,
}

/// Metadata stored alongside an archived recording.
///
/// Serializable for JSON export to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub segment_count: usize,
    pub chunk_count: Option<u64>,
    pub streaming: bool,
    pub duration_secs: f64,
    pub checksum: String,
    pub created_at: String,
}

impl RecordingMetadata {
    pub fn from_result(result: &RecordingResult) -> Self {
        Self {
            id: result.recording_id.clone(),
            mime_type: result.mime_type.clone(),
            size_bytes: result.total_bytes,
            segment_count: result.segment_count,
            chunk_count: result.chunk_count,
            streaming: result.chunk_count.is_some(),
            duration_secs: result.duration_secs,
            checksum: result.checksum.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
