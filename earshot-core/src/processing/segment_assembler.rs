//! Turns encoder segments into independently decodable chunks.
//!
//! Rules, evaluated in order:
//! ```text
//! index 0            → segment as-is; header extracted into the cache
//! header cached      → [cached header][segment]
//! header never found → [segment 0][segment 1]...[segment n]
//! ```
//! The last rule resends everything captured so far on every chunk. It keeps
//! the stream decodable when no header could be found, at the cost of
//! bandwidth that grows with session length.

use super::header_cache::HeaderCache;
use crate::models::stream_models::RawSegment;

/// Which rule produced a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyPolicy {
    /// First segment, sent unmodified.
    Initial,
    /// Cached header followed by the segment.
    HeaderPrefixed,
    /// Concatenation of every segment captured so far.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledChunk {
    pub data: Vec<u8>,
    pub policy: AssemblyPolicy,
}

/// Build the chunk for `current`.
///
/// `captured` holds every segment of the session in capture order, `current`
/// included as its last element.
pub fn assemble(current: &RawSegment, cache: &mut HeaderCache, captured: &[RawSegment]) -> AssembledChunk {
    if current.index == 0 {
        if !cache.try_set_from_segment(&current.data) {
            log::warn!(
                "no cluster marker in first segment ({} bytes); later chunks resend the whole recording",
                current.len()
            );
        }
        return AssembledChunk {
            data: current.data.clone(),
            policy: AssemblyPolicy::Initial,
        };
    }

    if let Some(header) = cache.get() {
        let mut data = Vec::with_capacity(header.len() + current.len());
        data.extend_from_slice(header);
        data.extend_from_slice(&current.data);
        return AssembledChunk {
            data,
            policy: AssemblyPolicy::HeaderPrefixed,
        };
    }

    let total: usize = captured.iter().map(RawSegment::len).sum();
    let mut data = Vec::with_capacity(total);
    for segment in captured {
        data.extend_from_slice(&segment.data);
    }
    AssembledChunk {
        data,
        policy: AssemblyPolicy::Fallback,
    }
}
