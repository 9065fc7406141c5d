//! Timestamped captures of a capability's state.

use std::mem;

/// One immutable capture of a capability's state at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<S> {
    timestamp: f64,
    payload: S,
}

impl<S> Snapshot<S> {
    /// Create a snapshot. Only recorders construct these.
    pub(crate) fn new(timestamp: f64, payload: S) -> Self {
        Self { timestamp, payload }
    }

    /// Timeline time (seconds) at which the state was captured.
    #[inline]
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// The captured state.
    #[inline]
    pub fn payload(&self) -> &S {
        &self.payload
    }

    /// Size in bytes of one stored snapshot of this payload type.
    ///
    /// Heap data owned by the payload (clip names) is not included.
    #[inline]
    pub const fn size_bytes() -> usize {
        mem::size_of::<Self>()
    }
}
