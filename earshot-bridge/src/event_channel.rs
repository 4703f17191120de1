//! Host event channel.
//!
//! Every delegate call becomes one JSON line on the sink:
//!
//! ```text
//! {"event":"recording_status","payload":"recording"}
//! {"event":"audio_chunk","payload":{"data":"GkXfo...","type":"audio/webm","size":4821,"index":0,"timestamp":1760868000000}}
//! {"event":"recorded_audio","payload":{"data":"GkXfo...","type":"audio/webm","size":96210,"timestamp":1760868012000}}
//! {"event":"streaming_complete","payload":{"total_chunks":4,"timestamp":1760868012001}}
//! {"event":"recording_status","payload":"stopped"}
//! ```

use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use earshot_core::{
    CaptureDelegate, CaptureError, ConsolidatedRecording, RecordingStatus, StreamChunk, StreamingSummary,
};

use crate::error::BridgeError;

pub const EVENT_STATUS: &str = "recording_status";
pub const EVENT_ERROR: &str = "recording_error";
pub const EVENT_CHUNK: &str = "audio_chunk";
pub const EVENT_RECORDING: &str = "recorded_audio";
pub const EVENT_STREAMING_COMPLETE: &str = "streaming_complete";

/// One line on the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostEvent<T> {
    pub event: String,
    pub payload: T,
}

/// Audio bytes plus their delivery metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioPayload {
    /// Base64, standard alphabet.
    pub data: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: usize,
    /// Present on streamed chunks only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    pub timestamp: i64,
}

impl AudioPayload {
    fn encode(data: &[u8], content_type: &str, index: Option<u64>, timestamp: i64) -> Self {
        Self {
            data: STANDARD.encode(data),
            content_type: content_type.to_string(),
            size: data.len(),
            index,
            timestamp,
        }
    }

    pub fn decode_data(&self) -> Result<Vec<u8>, BridgeError> {
        Ok(STANDARD.decode(&self.data)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingCompletePayload {
    pub total_chunks: u64,
    pub timestamp: i64,
}

/// `CaptureDelegate` that writes newline-delimited JSON events to a sink.
pub struct EventChannel<W: Write + Send> {
    sink: Mutex<W>,
}

impl<W: Write + Send> EventChannel<W> {
    pub fn new(sink: W) -> Self {
        Self { sink: Mutex::new(sink) }
    }

    /// Borrow the underlying sink.
    pub fn sink(&self) -> MutexGuard<'_, W> {
        self.sink.lock()
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }

    fn emit<T: Serialize>(&self, event: &str, payload: T) {
        if let Err(e) = self.try_emit(event, payload) {
            log::error!("failed to emit {}: {}", event, e);
        }
    }

    fn try_emit<T: Serialize>(&self, event: &str, payload: T) -> Result<(), BridgeError> {
        let line = serde_json::to_vec(&HostEvent {
            event: event.to_string(),
            payload,
        })?;
        let mut sink = self.sink.lock();
        sink.write_all(&line)?;
        sink.write_all(b"\n")?;
        sink.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> CaptureDelegate for EventChannel<W> {
    fn on_status_changed(&self, status: RecordingStatus) {
        self.emit(EVENT_STATUS, status.as_str());
    }

    fn on_error(&self, error: &CaptureError) {
        self.emit(
            EVENT_ERROR,
            ErrorPayload {
                kind: error.kind().to_string(),
                message: error.to_string(),
            },
        );
    }

    fn on_chunk(&self, chunk: &StreamChunk) {
        self.emit(
            EVENT_CHUNK,
            AudioPayload::encode(&chunk.data, &chunk.content_type, Some(chunk.index), chunk.timestamp),
        );
    }

    fn on_recording(&self, recording: &ConsolidatedRecording) {
        self.emit(
            EVENT_RECORDING,
            AudioPayload::encode(&recording.data, &recording.content_type, None, recording.timestamp),
        );
    }

    fn on_streaming_complete(&self, summary: &StreamingSummary) {
        self.emit(
            EVENT_STREAMING_COMPLETE,
            StreamingCompletePayload {
                total_chunks: summary.total_chunks,
                timestamp: summary.timestamp,
            },
        );
    }
}

/// Parse every line of a channel transcript.
pub fn parse_events(transcript: &[u8]) -> Result<Vec<HostEvent<serde_json::Value>>, BridgeError> {
    transcript
        .split(|b| *b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_slice(line).map_err(BridgeError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io;

    use earshot_core::{AssemblyPolicy, UnsupportedReason};

    use super::*;

    #[test]
    fn status_is_a_bare_string() {
        let channel = EventChannel::new(Vec::new());
        channel.on_status_changed(RecordingStatus::Recording);
        channel.on_status_changed(RecordingStatus::Stopped);

        let text = String::from_utf8(channel.into_inner()).unwrap();
        assert_eq!(
            text,
            "{\"event\":\"recording_status\",\"payload\":\"recording\"}\n\
             {\"event\":\"recording_status\",\"payload\":\"stopped\"}\n"
        );
    }

    #[test]
    fn chunk_payload_is_base64_with_index() {
        let channel = EventChannel::new(Vec::new());
        channel.on_chunk(&StreamChunk {
            data: vec![0x1A, 0x45, 0xDF, 0xA3],
            content_type: "audio/webm".into(),
            index: 7,
            timestamp: 1_700_000_000_000,
            policy: AssemblyPolicy::HeaderPrefixed,
        });

        let events = parse_events(&channel.sink()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, EVENT_CHUNK);

        let payload: AudioPayload = serde_json::from_value(events[0].payload.clone()).unwrap();
        assert_eq!(payload.data, "GkXfow==");
        assert_eq!(payload.decode_data().unwrap(), vec![0x1A, 0x45, 0xDF, 0xA3]);
        assert_eq!(payload.content_type, "audio/webm");
        assert_eq!(payload.size, 4);
        assert_eq!(payload.index, Some(7));
        assert_eq!(payload.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn recording_payload_has_no_index() {
        let channel = EventChannel::new(Vec::new());
        channel.on_recording(&ConsolidatedRecording {
            data: b"abc".to_vec(),
            content_type: "audio/webm".into(),
            timestamp: 5,
            segment_count: 1,
        });

        let events = parse_events(&channel.sink()).unwrap();
        assert_eq!(events[0].event, EVENT_RECORDING);
        assert!(events[0].payload.get("index").is_none());
        assert_eq!(events[0].payload["type"], "audio/webm");
        assert_eq!(events[0].payload["size"], 3);
    }

    #[test]
    fn error_payload_names_kind() {
        let channel = EventChannel::new(Vec::new());
        channel.on_error(&CaptureError::EnvironmentUnsupported(UnsupportedReason::NoSecureContext));

        let events = parse_events(&channel.sink()).unwrap();
        let payload: ErrorPayload = serde_json::from_value(events[0].payload.clone()).unwrap();
        assert_eq!(payload.kind, "EnvironmentUnsupported");
        assert!(payload.message.contains("secure context"));
    }

    #[test]
    fn streaming_complete_carries_total() {
        let channel = EventChannel::new(Vec::new());
        channel.on_streaming_complete(&StreamingSummary {
            total_chunks: 12,
            timestamp: 99,
        });

        let events = parse_events(&channel.sink()).unwrap();
        let payload: StreamingCompletePayload = serde_json::from_value(events[0].payload.clone()).unwrap();
        assert_eq!(payload, StreamingCompletePayload { total_chunks: 12, timestamp: 99 });
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "host went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_do_not_panic() {
        let channel = EventChannel::new(BrokenPipe);
        channel.on_status_changed(RecordingStatus::Recording);
        assert!(channel.try_emit(EVENT_STATUS, "stopped").is_err());
    }

    #[test]
    fn rejects_corrupt_base64() {
        let payload = AudioPayload {
            data: "not base64!".into(),
            content_type: "audio/webm".into(),
            size: 0,
            index: None,
            timestamp: 0,
        };
        assert!(matches!(payload.decode_data(), Err(BridgeError::Base64(_))));
    }
}
