use std::collections::HashMap;

use crate::flags::Flags;
use crate::headers::HeaderMap;
use crate::method::Method;

/// Per-request scan cursor and outputs.
///
/// Owned by the calling worker for one request and populated in place. On a
/// failed scan the flag word is set and the partial state remains
/// observable; callers must treat the outputs as invalid once any error
/// flag is present.
#[derive(Debug, Default)]
pub struct RequestState {
    /// Cursor into the read buffer, advanced as scanning commits.
    pub offset: usize,
    /// Header bytes consumed so far, across continuations.
    pub header_size: usize,
    /// Method recognized by the request line scan.
    pub method: Option<Method>,
    /// Accumulated result flags.
    pub flags: Flags,
    /// Path parameter values in route declaration order.
    pub params: Vec<String>,
    /// Decoded query pairs; insertion order is not preserved.
    pub query: HashMap<String, String>,
    /// Committed headers, canonical lowercase names.
    pub headers: HeaderMap,
}

impl RequestState {
    /// Create a fresh state positioned at the start of a buffer.
    pub fn new() -> RequestState {
        RequestState::default()
    }

    /// Reset for reuse on the next request of a connection.
    ///
    /// Keeps the container allocations.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.header_size = 0;
        self.method = None;
        self.flags = Flags::OK;
        self.params.clear();
        self.query.clear();
        self.headers.clear();
    }
}
