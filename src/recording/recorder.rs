//! Bounded snapshot history with cadence-gated capture and interpolated sampling.

use std::collections::VecDeque;

use super::interpolate::Interpolate;
use super::snapshot::Snapshot;
use crate::schema::RecordingConfig;

/// Tolerance for comparing accumulated frame times against the interval.
pub const TIME_EPSILON: f64 = 1e-6;

/// Bounded history of snapshots for one capability instance.
///
/// Timestamps in the history are strictly increasing. Entries older than the
/// configured recording duration are evicted when a new snapshot is written.
/// A snapshot whose age equals the duration exactly is kept.
///
/// Usage:
/// ```ignore
/// let mut recorder = Recorder::new(RecordingConfig::new(0.5, 2.0)?);
/// recorder.record(0.0, position_at_zero);
/// recorder.record(0.5, position_at_half);
/// let blended = recorder.sample(0.25);
/// ```
#[derive(Debug, Clone)]
pub struct Recorder<S> {
    config: RecordingConfig,
    history: VecDeque<Snapshot<S>>,
    capacity: usize,
}

impl<S: Interpolate> Recorder<S> {
    /// Create an empty recorder. The ring buffer is allocated up front.
    pub fn new(config: RecordingConfig) -> Self {
        let capacity = Self::capacity_for(&config);
        Self {
            config,
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn capacity_for(config: &RecordingConfig) -> usize {
        if config.rewindable {
            config.snapshot_count() + 1
        } else {
            0
        }
    }

    /// Get the active recording configuration.
    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }

    /// Apply a new configuration.
    ///
    /// History recorded at a different interval would misrepresent playback
    /// density, so an interval change (or toggling `rewindable`) discards it.
    /// A duration change keeps the history: the buffer grows, or the oldest
    /// entries beyond the new duration are evicted. Returns true if a reset
    /// happened.
    pub fn reconfigure(&mut self, config: RecordingConfig) -> bool {
        let reset = config.recording_interval != self.config.recording_interval
            || config.rewindable != self.config.rewindable;
        let resized = config.recording_duration != self.config.recording_duration;
        self.config = config;
        self.capacity = Self::capacity_for(&config);

        if reset {
            self.history = VecDeque::with_capacity(self.capacity);
        } else if resized {
            if self.capacity > self.history.len() {
                self.history.reserve(self.capacity - self.history.len());
            }
            if let Some(newest) = self.newest_timestamp() {
                self.evict_older_than(newest);
            }
        }
        reset
    }

    /// Drop snapshots older than the duration relative to `now`, then any
    /// beyond capacity.
    fn evict_older_than(&mut self, now: f64) {
        let duration = self.config.recording_duration;
        while let Some(oldest) = self.history.front() {
            if now - oldest.timestamp() > duration + TIME_EPSILON {
                self.history.pop_front();
            } else {
                break;
            }
        }
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    /// Number of retained snapshots.
    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if no snapshot is retained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Maximum number of snapshots this recorder will ever retain.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Timestamp of the oldest retained snapshot.
    pub fn oldest_timestamp(&self) -> Option<f64> {
        self.history.front().map(Snapshot::timestamp)
    }

    /// Timestamp of the newest retained snapshot.
    pub fn newest_timestamp(&self) -> Option<f64> {
        self.history.back().map(Snapshot::timestamp)
    }

    /// Iterate over retained snapshots, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Snapshot<S>> {
        self.history.iter()
    }

    /// Check whether a capture at `now` would be stored.
    pub fn is_due(&self, now: f64) -> bool {
        if !self.config.rewindable || !now.is_finite() {
            return false;
        }
        match self.history.back() {
            Some(last) => now - last.timestamp() >= self.config.recording_interval - TIME_EPSILON,
            None => true,
        }
    }

    /// Record a state captured at `now`.
    ///
    /// Returns true if the snapshot was stored; calls arriving before the
    /// interval has elapsed since the last capture are skipped.
    pub fn record(&mut self, now: f64, state: S) -> bool {
        if !self.is_due(now) {
            return false;
        }

        self.history.push_back(Snapshot::new(now, state));
        self.evict_older_than(now);
        true
    }

    /// Sample the recorded state at an arbitrary timestamp.
    ///
    /// Timestamps outside the retained history clamp to the oldest or newest
    /// snapshot; no extrapolation is performed. Returns `None` when the history
    /// is empty, in which case the caller keeps its live state.
    pub fn sample(&self, at: f64) -> Option<S> {
        let oldest = self.history.front()?;
        if at <= oldest.timestamp() || at.is_nan() {
            return Some(oldest.payload().clone());
        }
        let newest = self.history.back()?;
        if at >= newest.timestamp() {
            return Some(newest.payload().clone());
        }

        // First snapshot strictly after `at`; always in 1..len here
        let next = self.history.partition_point(|s| s.timestamp() <= at);
        let before = &self.history[next - 1];
        if before.timestamp() == at {
            return Some(before.payload().clone());
        }
        let after = &self.history[next];

        let span = after.timestamp() - before.timestamp();
        let t = ((at - before.timestamp()) / span) as f32;
        Some(before.payload().interpolate(after.payload(), t))
    }

    /// Discard all history.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Discard snapshots newer than `time`.
    ///
    /// Used when normal playback resumes from a rewound position: the future
    /// is re-recorded from there. Returns the number of dropped snapshots.
    pub fn truncate_after(&mut self, time: f64) -> usize {
        let keep = self.history.partition_point(|s| s.timestamp() <= time);
        let dropped = self.history.len() - keep;
        self.history.truncate(keep);
        dropped
    }

    /// Estimated bytes needed to hold a full history.
    ///
    /// Uses the same formula as [`estimate_memory_usage`] so the runtime and
    /// design-time figures agree.
    pub fn estimate_memory_usage(&self) -> usize {
        estimate_memory_usage::<S>(&self.config)
    }
}

/// Estimate the bytes a full history of `S` snapshots needs under `config`.
///
/// `ceil(duration / interval) * size_of(snapshot)`, or 0 if not rewindable.
pub fn estimate_memory_usage<S>(config: &RecordingConfig) -> usize {
    if !config.rewindable {
        return 0;
    }
    config.snapshot_count() * Snapshot::<S>::size_bytes()
}
