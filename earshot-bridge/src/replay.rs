//! File-replay capture provider.
//!
//! Plays back a recorded container file as if a live encoder were producing
//! it: the file is cut at cluster boundaries and one unit is delivered per
//! cadence tick from a dedicated thread. Whatever has not been delivered when
//! the encoder is finalized comes back as the final segment.

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use earshot_core::processing::cluster_marker;
use earshot_core::{CaptureError, CaptureProvider, SegmentCallback};

/// Split container bytes into encoder-like segments.
///
/// The header travels with the first cluster; every later segment starts at
/// a cluster marker. Without any marker the whole input is one segment.
pub fn split_into_units(data: &[u8]) -> Vec<Vec<u8>> {
    let mut units = Vec::new();
    let mut start = 0;
    for offset in cluster_marker::cluster_offsets(data).into_iter().skip(1) {
        units.push(data[start..offset].to_vec());
        start = offset;
    }
    if start < data.len() {
        units.push(data[start..].to_vec());
    }
    units
}

/// Replays a container file through the `CaptureProvider` interface.
pub struct ReplayProvider {
    path: PathBuf,
    secure_context: bool,
    capture_api: bool,
    acquired: bool,
    pending: Arc<Mutex<VecDeque<Vec<u8>>>>,
    stop_tx: Option<Sender<()>>,
    encoder_handle: Option<thread::JoinHandle<()>>,
}

impl ReplayProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            secure_context: true,
            capture_api: true,
            acquired: false,
            pending: Arc::new(Mutex::new(VecDeque::new())),
            stop_tx: None,
            encoder_handle: None,
        }
    }

    /// Pretend the host context is (or is not) secure.
    pub fn with_secure_context(mut self, secure: bool) -> Self {
        self.secure_context = secure;
        self
    }

    /// Pretend the capture API is (or is not) present.
    pub fn with_capture_api(mut self, available: bool) -> Self {
        self.capture_api = available;
        self
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired
    }

    /// Units not yet delivered.
    pub fn pending_units(&self) -> usize {
        self.pending.lock().len()
    }

    fn stop_encoder_thread(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.encoder_handle.take() {
            let _ = handle.join();
        }
    }
}

impl CaptureProvider for ReplayProvider {
    fn is_secure_context(&self) -> bool {
        self.secure_context
    }

    fn is_capture_api_available(&self) -> bool {
        self.capture_api
    }

    fn acquire(&mut self) -> Result<(), CaptureError> {
        let data = fs::read(&self.path)
            .map_err(|e| CaptureError::DeviceAccessDenied(format!("{}: {}", self.path.display(), e)))?;

        let units = split_into_units(&data);
        log::debug!("replay source {} split into {} units", self.path.display(), units.len());

        *self.pending.lock() = units.into();
        self.acquired = true;
        Ok(())
    }

    fn start(&mut self, cadence: Option<Duration>, callback: SegmentCallback) -> Result<(), CaptureError> {
        if !self.acquired {
            return Err(CaptureError::DeviceAccessDenied("replay source not acquired".into()));
        }
        if self.encoder_handle.is_some() {
            return Err(CaptureError::ConfigurationFailed("replay encoder already running".into()));
        }

        // Batch mode: everything is delivered by `finalize`.
        let Some(cadence) = cadence else {
            return Ok(());
        };

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let pending = Arc::clone(&self.pending);

        let handle = thread::Builder::new()
            .name("replay-encoder".into())
            .spawn(move || loop {
                match stop_rx.recv_timeout(cadence) {
                    Err(RecvTimeoutError::Timeout) => {
                        let next = pending.lock().pop_front();
                        if let Some(unit) = next {
                            callback(unit);
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|e| CaptureError::Unknown(format!("failed to spawn replay thread: {}", e)))?;

        self.stop_tx = Some(stop_tx);
        self.encoder_handle = Some(handle);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Option<Vec<u8>>, CaptureError> {
        self.stop_encoder_thread();

        let remaining: Vec<u8> = self.pending.lock().drain(..).flatten().collect();
        Ok((!remaining.is_empty()).then_some(remaining))
    }

    fn release(&mut self) {
        self.stop_encoder_thread();
        self.pending.lock().clear();
        self.acquired = false;
    }
}

impl Drop for ReplayProvider {
    fn drop(&mut self) {
        self.stop_encoder_thread();
    }
}
