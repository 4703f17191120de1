use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::models::config::{CaptureConfiguration, SharedConfiguration};
use crate::models::error::{CaptureError, UnsupportedReason};
use crate::models::recording_result::RecordingResult;
use crate::models::state::{CaptureState, RecordingStatus};
use crate::models::stream_models::{
    now_millis, ConsolidatedRecording, RawSegment, SessionDiagnostics, StreamChunk, StreamingSummary,
};
use crate::processing::header_cache::HeaderCache;
use crate::processing::segment_assembler::{self, AssemblyPolicy};
use crate::storage::recording_archive::{self, RecordingArchive};
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::capture_provider::{CaptureProvider, SegmentCallback};
use crate::traits::capture_session::CaptureSession;

/// Per-session mutable state, shared with the provider's segment callback.
///
/// The lock is held for the whole of each segment's processing, so segments
/// are handled strictly one after another. Delegate callbacks run after it is
/// released; see [`Delivery`].
struct SessionState {
    state: CaptureState,
    /// Bumped on every start; callbacks from older sessions are dropped.
    generation: u64,
    /// Cleared once the device is released.
    accepting: bool,
    announced: bool,
    recording_id: String,
    content_type: String,
    archive_directory: Option<PathBuf>,
    capture_start: Option<Instant>,
    header: HeaderCache,
    next_chunk_index: u64,
    segments: Vec<RawSegment>,
    diagnostics: SessionDiagnostics,
}

impl SessionState {
    fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            generation: 0,
            accepting: false,
            announced: false,
            recording_id: String::new(),
            content_type: String::new(),
            archive_directory: None,
            capture_start: None,
            header: HeaderCache::new(),
            next_chunk_index: 0,
            segments: Vec::new(),
            diagnostics: SessionDiagnostics::default(),
        }
    }

    fn begin(&mut self, config: &CaptureConfiguration) -> u64 {
        self.generation += 1;
        self.state = CaptureState::Capturing {
            streaming: config.streaming_enabled,
        };
        self.accepting = true;
        self.announced = false;
        self.recording_id = uuid::Uuid::new_v4().to_string();
        self.content_type = config.mime_type.clone();
        self.archive_directory = config.archive_directory.clone();
        self.capture_start = Some(Instant::now());
        self.header.reset();
        self.next_chunk_index = 0;
        self.segments.clear();
        self.diagnostics = SessionDiagnostics::default();
        self.generation
    }

    fn abort(&mut self) {
        self.state = CaptureState::Idle;
        self.accepting = false;
        self.capture_start = None;
    }

    fn elapsed_duration(&self) -> f64 {
        self.capture_start.map(|start| start.elapsed().as_secs_f64()).unwrap_or(0.0)
    }

    /// True exactly once per session: "recording" goes out before the first chunk.
    fn take_announcement(&mut self) -> bool {
        !std::mem::replace(&mut self.announced, true)
    }

    fn handle_segment(&mut self, generation: u64, data: Vec<u8>) -> Delivery {
        if generation != self.generation || !self.accepting {
            self.diagnostics.late_segments_dropped += 1;
            log::debug!("dropping late segment ({} bytes) from session generation {}", data.len(), generation);
            return Delivery::default();
        }
        if data.is_empty() {
            return Delivery::default();
        }
        let mut delivery = Delivery {
            announce: self.take_announcement(),
            chunk: None,
        };

        let index = self.segments.len() as u64;
        self.diagnostics.segments_received += 1;
        self.diagnostics.bytes_received += data.len() as u64;
        self.segments.push(RawSegment::new(index, data));

        if !self.state.is_streaming() {
            return delivery;
        }

        let Some(current) = self.segments.last() else {
            return delivery;
        };
        let assembled = segment_assembler::assemble(current, &mut self.header, &self.segments);

        let chunk = StreamChunk {
            data: assembled.data,
            content_type: self.content_type.clone(),
            index: self.next_chunk_index,
            timestamp: now_millis(),
            policy: assembled.policy,
        };
        log::debug!("chunk {}: {} bytes ({:?})", chunk.index, chunk.size(), chunk.policy);

        self.diagnostics.chunks_delivered += 1;
        self.diagnostics.bytes_transmitted += chunk.size() as u64;
        if chunk.policy == AssemblyPolicy::Fallback {
            self.diagnostics.fallback_chunks += 1;
        }

        self.next_chunk_index += 1;
        delivery.chunk = Some(chunk);
        delivery
    }
}

/// Delegate notifications produced by one segment.
///
/// Built under the state lock and sent after it is released, while the
/// session's delivery lock is still held. Lock order is always delivery
/// then state, so chunks reach the delegate in index order and a delegate
/// may read session state from inside `on_chunk`.
#[derive(Default)]
struct Delivery {
    announce: bool,
    chunk: Option<StreamChunk>,
}

impl Delivery {
    fn send(self, delegate: Option<&Arc<dyn CaptureDelegate>>) {
        let Some(d) = delegate else {
            return;
        };
        if self.announce {
            d.on_status_changed(RecordingStatus::Recording);
        }
        if let Some(chunk) = self.chunk {
            d.on_chunk(&chunk);
        }
    }
}

/// Drives one capture device through record/stop cycles.
///
/// ```text
/// [CaptureProvider] ──segment──▶ accumulate ──streaming?──▶ [SegmentAssembler] ──▶ delegate.on_chunk
///                                    │
///                                  stop ──▶ ConsolidatedRecording ──▶ delegate.on_recording
/// ```
///
/// Streaming mode is read from the shared configuration at `start` and
/// stays fixed until `stop`.
pub struct StreamingSession<P: CaptureProvider> {
    provider: P,
    config: SharedConfiguration,
    delegate: Option<Arc<dyn CaptureDelegate>>,
    session_state: Arc<Mutex<SessionState>>,
    delivery: Arc<Mutex<()>>,
}

impl<P: CaptureProvider> StreamingSession<P> {
    pub fn new(provider: P, config: SharedConfiguration) -> Self {
        Self {
            provider,
            config,
            delegate: None,
            session_state: Arc::new(Mutex::new(SessionState::new())),
            delivery: Arc::new(Mutex::new(())),
        }
    }

    /// Takes effect from the next `start`.
    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn configuration(&self) -> &SharedConfiguration {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn state(&self) -> CaptureState {
        self.session_state.lock().state
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        self.session_state.lock().diagnostics.clone()
    }

    /// Header cached for the current (or most recent) session.
    pub fn cached_header(&self) -> Option<Vec<u8>> {
        self.session_state.lock().header.get().map(<[u8]>::to_vec)
    }

    /// Start capture. Transitions: idle → capturing.
    ///
    /// A no-op while already capturing. Failures leave the session idle.
    /// Environment and device failures are also reported to the delegate; an
    /// invalid configuration is only returned, since the host cannot act on it.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.session_state.lock().state.is_capturing() {
            log::debug!("start ignored: already capturing");
            return Ok(());
        }

        if !self.provider.is_secure_context() {
            return Err(self.report(CaptureError::EnvironmentUnsupported(UnsupportedReason::NoSecureContext)));
        }
        if !self.provider.is_capture_api_available() {
            return Err(self.report(CaptureError::EnvironmentUnsupported(UnsupportedReason::CaptureApiMissing)));
        }

        let config = self.config.snapshot();
        if let Err(msg) = config.validate() {
            log::warn!("capture start failed: invalid configuration: {}", msg);
            return Err(CaptureError::ConfigurationFailed(msg));
        }

        if let Err(e) = self.provider.acquire() {
            return Err(self.report(device_error(e)));
        }

        let generation = self.session_state.lock().begin(&config);
        let callback = self.segment_callback(generation);

        if let Err(e) = self.provider.start(config.cadence(), callback) {
            self.session_state.lock().abort();
            self.provider.release();
            return Err(self.report(device_error(e)));
        }

        {
            let _delivering = self.delivery.lock();
            let announce = self.session_state.lock().take_announcement();
            Delivery { announce, chunk: None }.send(self.delegate.as_ref());
        }
        log::info!(
            "capture started (streaming: {}, cadence: {:?})",
            config.streaming_enabled,
            config.cadence()
        );
        Ok(())
    }

    /// Stop capture, deliver the consolidated recording, return its summary.
    /// Transitions: capturing → idle.
    ///
    /// Returns `Ok(None)` without any side effect when already idle. The
    /// device is released even if the encoder fails to finalize.
    pub fn stop(&mut self) -> Result<Option<RecordingResult>, CaptureError> {
        let (streaming, generation) = {
            let s = self.session_state.lock();
            match s.state {
                CaptureState::Idle => return Ok(None),
                CaptureState::Capturing { streaming } => (streaming, s.generation),
            }
        };

        // The provider may still deliver through the callback here, so the
        // session lock must not be held across this call.
        let flushed = match self.provider.finalize() {
            Ok(flushed) => flushed,
            Err(e) => {
                log::error!("encoder finalize failed: {}", e);
                None
            }
        };
        {
            let _delivering = self.delivery.lock();
            let delivery = {
                let mut s = self.session_state.lock();
                let delivery = flushed.map(|data| s.handle_segment(generation, data));
                s.accepting = false;
                delivery
            };
            if let Some(delivery) = delivery {
                delivery.send(self.delegate.as_ref());
            }
        }
        self.provider.release();

        let (recording, chunk_count, recording_id, duration, archive_directory) = {
            let mut s = self.session_state.lock();
            let segments = std::mem::take(&mut s.segments);
            (
                ConsolidatedRecording::from_segments(&segments, &s.content_type),
                s.next_chunk_index,
                s.recording_id.clone(),
                s.elapsed_duration(),
                s.archive_directory.clone(),
            )
        };

        if let Some(ref d) = self.delegate {
            d.on_recording(&recording);
            if streaming {
                d.on_streaming_complete(&StreamingSummary {
                    total_chunks: chunk_count,
                    timestamp: now_millis(),
                });
            }
        }

        let mut result = RecordingResult {
            recording_id,
            mime_type: recording.content_type.clone(),
            total_bytes: recording.size() as u64,
            segment_count: recording.segment_count,
            chunk_count: streaming.then_some(chunk_count),
            duration_secs: duration,
            checksum: recording_archive::sha256_hex(&recording.data),
            file_path: None,
        };

        if let Some(dir) = archive_directory {
            match RecordingArchive::new(dir).save(&recording, &result) {
                Ok(path) => result.file_path = Some(path),
                Err(e) => log::error!("failed to archive recording {}: {}", result.recording_id, e),
            }
        }

        self.session_state.lock().abort();
        if let Some(ref d) = self.delegate {
            d.on_status_changed(RecordingStatus::Stopped);
        }
        log::info!(
            "capture stopped ({} segments, {} bytes)",
            result.segment_count,
            result.total_bytes
        );

        Ok(Some(result))
    }

    // --- Internal helpers ---

    fn segment_callback(&self, generation: u64) -> SegmentCallback {
        let session_state = Arc::clone(&self.session_state);
        let delivery = Arc::clone(&self.delivery);
        let delegate = self.delegate.clone();
        Arc::new(move |data: Vec<u8>| {
            let _delivering = delivery.lock();
            let pending = session_state.lock().handle_segment(generation, data);
            pending.send(delegate.as_ref());
        })
    }

    fn report(&self, error: CaptureError) -> CaptureError {
        log::warn!("capture start failed: {}", error);
        if let Some(ref d) = self.delegate {
            d.on_error(&error);
        }
        error
    }
}

/// Everything that goes wrong with the device or its encoder surfaces to the
/// host as `DeviceAccessDenied`, carrying the provider's cause.
fn device_error(error: CaptureError) -> CaptureError {
    match error {
        CaptureError::DeviceAccessDenied(_) => error,
        other => CaptureError::DeviceAccessDenied(other.to_string()),
    }
}

impl<P: CaptureProvider> CaptureSession for StreamingSession<P> {
    fn state(&self) -> CaptureState {
        StreamingSession::state(self)
    }

    fn diagnostics(&self) -> SessionDiagnostics {
        StreamingSession::diagnostics(self)
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        StreamingSession::start(self)
    }

    fn stop(&mut self) -> Result<Option<RecordingResult>, CaptureError> {
        StreamingSession::stop(self)
    }
}

impl<P: CaptureProvider> Drop for StreamingSession<P> {
    fn drop(&mut self) {
        if self.session_state.lock().state.is_capturing() {
            let _ = self.provider.finalize();
            self.session_state.lock().abort();
            self.provider.release();
        }
    }
}
