use crate::processing::segment_assembler::AssemblyPolicy;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// One encoder segment, exactly as emitted for a cadence interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    pub data: Vec<u8>,
    /// 0-based position in emission order.
    pub index: u64,
    pub captured_at: i64,
}

impl RawSegment {
    pub fn new(index: u64, data: Vec<u8>) -> Self {
        Self {
            data,
            index,
            captured_at: now_millis(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A self-contained buffer handed to the transport in streaming mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    pub data: Vec<u8>,
    pub content_type: String,
    pub index: u64,
    pub timestamp: i64,
    /// Which assembly rule produced `data`.
    pub policy: AssemblyPolicy,
}

impl StreamChunk {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Every segment of a session concatenated in capture order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedRecording {
    pub data: Vec<u8>,
    pub content_type: String,
    pub timestamp: i64,
    pub segment_count: usize,
}

impl ConsolidatedRecording {
    pub fn from_segments(segments: &[RawSegment], content_type: &str) -> Self {
        let total: usize = segments.iter().map(RawSegment::len).sum();
        let mut data = Vec::with_capacity(total);
        for segment in segments {
            data.extend_from_slice(&segment.data);
        }
        Self {
            data,
            content_type: content_type.to_string(),
            timestamp: now_millis(),
            segment_count: segments.len(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Reported once after the consolidated recording of a streaming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingSummary {
    pub total_chunks: u64,
    pub timestamp: i64,
}

/// Counters for debugging a capture session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDiagnostics {
    pub segments_received: u64,
    pub chunks_delivered: u64,
    pub bytes_received: u64,
    pub bytes_transmitted: u64,
    pub fallback_chunks: u64,
    /// Segments that arrived after release or from a previous session.
    pub late_segments_dropped: u64,
}
