//! # earshot-bridge
//!
//! Host-side collaborators for `earshot-core`.
//!
//! Provides:
//! - `EventChannel`: `CaptureDelegate` writing newline-delimited JSON events
//!   (base64 audio payloads) to any `Write` sink
//! - `ReplayProvider`: `CaptureProvider` that replays a recorded container
//!   file at the encoder cadence
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use earshot_bridge::{EventChannel, ReplayProvider};
//! use earshot_core::{CaptureConfiguration, SharedConfiguration, StreamingSession};
//!
//! let config = SharedConfiguration::new(CaptureConfiguration { streaming_enabled: true, ..Default::default() });
//! let mut session = StreamingSession::new(ReplayProvider::new("take.webm"), config);
//! session.set_delegate(Arc::new(EventChannel::new(std::io::stdout())));
//! session.start()?;
//! ```

pub mod error;
pub mod event_channel;
pub mod replay;

pub use error::BridgeError;
pub use event_channel::{parse_events, AudioPayload, EventChannel, HostEvent};
pub use replay::{split_into_units, ReplayProvider};
