use super::cluster_marker;

/// Single-slot store for the container header of one session.
///
/// Set at most once; cleared only by `reset` when a new session starts.
#[derive(Debug, Default, Clone)]
pub struct HeaderCache {
    header: Option<Vec<u8>>,
}

impl HeaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `extracted` if the slot is empty and extraction succeeded.
    ///
    /// Returns whether the slot was filled by this call.
    pub fn try_set(&mut self, extracted: Option<&[u8]>) -> bool {
        match (&self.header, extracted) {
            (None, Some(bytes)) => {
                self.header = Some(bytes.to_vec());
                true
            }
            _ => false,
        }
    }

    /// Run header extraction on `segment` and store the result.
    pub fn try_set_from_segment(&mut self, segment: &[u8]) -> bool {
        self.try_set(cluster_marker::extract_header(segment))
    }

    pub fn get(&self) -> Option<&[u8]> {
        self.header.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.header.is_some()
    }

    pub fn reset(&mut self) {
        self.header = None;
    }
}
