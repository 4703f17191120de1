//! # earshot-core
//!
//! Platform-agnostic microphone capture core.
//!
//! Turns the header-once container stream of an audio encoder into a sequence
//! of self-contained chunks for near-real-time delivery, and consolidates the
//! whole session into a single recording on stop. Capture backends implement
//! the `CaptureProvider` trait; the host receives everything through a
//! `CaptureDelegate`.
//!
//! ## Architecture
//!
//! ```text
//! earshot-core (this crate)
//! ├── traits/       ← CaptureProvider, CaptureDelegate, CaptureSession
//! ├── models/       ← CaptureError, CaptureState, CaptureConfiguration, segments and chunks
//! ├── processing/   ← cluster marker search, HeaderCache, segment assembly
//! ├── session/      ← StreamingSession (orchestrator)
//! └── storage/      ← RecordingArchive, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{CaptureConfiguration, SharedConfiguration};
pub use models::error::{CaptureError, UnsupportedReason};
pub use models::recording_result::{RecordingMetadata, RecordingResult};
pub use models::state::{CaptureState, RecordingStatus};
pub use models::stream_models::{ConsolidatedRecording, RawSegment, SessionDiagnostics, StreamChunk, StreamingSummary};
pub use processing::cluster_marker::CLUSTER_MARKER;
pub use processing::header_cache::HeaderCache;
pub use processing::segment_assembler::{AssembledChunk, AssemblyPolicy};
pub use session::streaming::StreamingSession;
pub use storage::recording_archive::RecordingArchive;
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::capture_provider::{CaptureProvider, SegmentCallback};
pub use traits::capture_session::CaptureSession;
