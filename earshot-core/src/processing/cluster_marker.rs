/// Stream-data-unit marker search for the WebM/Matroska container.
///
/// A recorder produces the container header once, followed by Cluster
/// elements. Every Cluster starts with the 4-byte EBML ID below, so the bytes
/// preceding the first occurrence are the header any decoder needs.
///
/// Layout of the first encoder segment:
/// ```text
/// [EBML header | Segment | Info | Tracks][1F 43 B6 75 | cluster payload ...]
///  ^-------------- header ------------^  ^-- first data unit
/// ```

/// Cluster element ID, big-endian.
pub const CLUSTER_MARKER: [u8; 4] = [0x1F, 0x43, 0xB6, 0x75];

/// Offset of the first marker in `buf`, or `None`.
///
/// Buffers shorter than the marker never match.
pub fn find_marker(buf: &[u8]) -> Option<usize> {
    find_marker_from(buf, 0)
}

/// Offset of the first marker at or after `start`.
pub fn find_marker_from(buf: &[u8], start: usize) -> Option<usize> {
    if start >= buf.len() {
        return None;
    }
    buf[start..]
        .windows(CLUSTER_MARKER.len())
        .position(|window| window == CLUSTER_MARKER)
        .map(|pos| start + pos)
}

/// Offsets of every marker in `buf`, in ascending order.
pub fn cluster_offsets(buf: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = find_marker_from(buf, cursor) {
        offsets.push(offset);
        cursor = offset + CLUSTER_MARKER.len();
    }
    offsets
}

/// Header bytes of `buf`: everything before the first marker.
///
/// Returns `None` when there is no marker, or when the marker sits at offset 0
/// and no header bytes precede it.
/// In both cases nothing is cached, and the session falls back to resending
/// every segment captured so far with each chunk.
pub fn extract_header(buf: &[u8]) -> Option<&[u8]> {
    match find_marker(buf) {
        Some(0) | None => None,
        Some(offset) => Some(&buf[..offset]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_marker_after_header() {
        let mut buf = vec![0xAA; 20];
        buf.extend_from_slice(&CLUSTER_MARKER);
        buf.extend_from_slice(&[1, 2, 3]);

        assert_eq!(find_marker(&buf), Some(20));
        assert_eq!(extract_header(&buf), Some(&[0xAA; 20][..]));
    }

    #[test]
    fn returns_leftmost_match() {
        let mut buf = vec![0x00, 0x01];
        buf.extend_from_slice(&CLUSTER_MARKER);
        buf.push(0x42);
        buf.extend_from_slice(&CLUSTER_MARKER);

        assert_eq!(find_marker(&buf), Some(2));
        assert_eq!(cluster_offsets(&buf), vec![2, 7]);
    }

    #[test]
    fn marker_at_end_of_buffer() {
        let mut buf = vec![0x10; 5];
        buf.extend_from_slice(&CLUSTER_MARKER);
        assert_eq!(find_marker(&buf), Some(5));
    }

    #[test]
    fn short_buffers_never_match() {
        assert_eq!(find_marker(&[]), None);
        assert_eq!(find_marker(&CLUSTER_MARKER[..3]), None);
        assert_eq!(find_marker_from(&CLUSTER_MARKER, 4), None);
        assert_eq!(find_marker_from(&CLUSTER_MARKER, 10), None);
    }

    #[test]
    fn partial_marker_is_not_a_match() {
        let buf = [0x1F, 0x43, 0xB6, 0x00, 0x1F, 0x43];
        assert_eq!(find_marker(&buf), None);
        assert!(cluster_offsets(&buf).is_empty());
    }

    #[test]
    fn marker_at_offset_zero_yields_no_header() {
        let mut buf = CLUSTER_MARKER.to_vec();
        buf.extend_from_slice(&[9, 9, 9]);

        assert_eq!(find_marker(&buf), Some(0));
        assert_eq!(extract_header(&buf), None);
    }

    #[test]
    fn search_from_offset_skips_earlier_markers() {
        let mut buf = CLUSTER_MARKER.to_vec();
        buf.extend_from_slice(&[0xEE, 0xEE]);
        buf.extend_from_slice(&CLUSTER_MARKER);

        assert_eq!(find_marker_from(&buf, 1), Some(6));
        assert_eq!(find_marker_from(&buf, 6), Some(6));
        assert_eq!(find_marker_from(&buf, 7), None);
    }
}
