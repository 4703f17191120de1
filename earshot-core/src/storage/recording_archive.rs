use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::error::CaptureError;
use crate::models::recording_result::{RecordingMetadata, RecordingResult};
use crate::models::stream_models::ConsolidatedRecording;

/// Writes finished recordings to a directory.
///
/// ```text
/// {dir}/recording_{id}.webm
/// {dir}/recording_{id}.metadata.json
/// ```
#[derive(Debug, Clone)]
pub struct RecordingArchive {
    directory: PathBuf,
}

impl RecordingArchive {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Write the recording and its metadata sidecar, returning the recording path.
    pub fn save(&self, recording: &ConsolidatedRecording, result: &RecordingResult) -> Result<PathBuf, CaptureError> {
        fs::create_dir_all(&self.directory)
            .map_err(|e| CaptureError::StorageError(format!("failed to create directory: {}", e)))?;

        let file_name = format!(
            "recording_{}.{}",
            result.recording_id,
            extension_for(&recording.content_type)
        );
        let path = self.directory.join(file_name);

        fs::write(&path, &recording.data)
            .map_err(|e| CaptureError::StorageError(format!("failed to write recording: {}", e)))?;

        let sidecar = serde_json::to_vec_pretty(&RecordingMetadata::from_result(result))
            .map_err(|e| CaptureError::StorageError(format!("failed to serialize metadata: {}", e)))?;
        fs::write(sidecar_path(&path), sidecar)
            .map_err(|e| CaptureError::StorageError(format!("failed to write metadata: {}", e)))?;
        Ok(path)
    }

    /// Load the sidecar written next to an archived recording.
    pub fn read_metadata(recording_path: &Path) -> Result<RecordingMetadata, CaptureError> {
        let json = fs::read(sidecar_path(recording_path))
            .map_err(|e| CaptureError::StorageError(format!("failed to read metadata: {}", e)))?;
        serde_json::from_slice(&json)
            .map_err(|e| CaptureError::StorageError(format!("failed to parse metadata: {}", e)))
    }
}

fn sidecar_path(recording_path: &Path) -> PathBuf {
    recording_path.with_extension("metadata.json")
}

/// File extension for a container content type.
pub fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    match essence {
        "audio/webm" | "video/webm" => "webm",
        "audio/ogg" => "ogg",
        "audio/mp4" => "m4a",
        _ => "bin",
    }
}

/// SHA-256 hex digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
