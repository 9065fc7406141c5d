//! Configuration types for recording and timeline parameters.

use serde::{Deserialize, Serialize};

/// Default seconds between two recorded snapshots.
pub const DEFAULT_RECORDING_INTERVAL: f64 = 0.5;

/// Default seconds of history retained per recorder.
pub const DEFAULT_RECORDING_DURATION: f64 = 30.0;

fn default_rewindable() -> bool {
    true
}

fn default_time_scale() -> f32 {
    1.0
}

/// Recording parameters shared by every recorder of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Seconds of simulated time between two captures.
    pub recording_interval: f64,
    /// Seconds of history retained before eviction.
    pub recording_duration: f64,
    /// Whether any history is retained at all.
    #[serde(default = "default_rewindable")]
    pub rewindable: bool,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            recording_interval: DEFAULT_RECORDING_INTERVAL,
            recording_duration: DEFAULT_RECORDING_DURATION,
            rewindable: true,
        }
    }
}

impl RecordingConfig {
    /// Create a rewindable configuration, validating both durations.
    pub fn new(recording_interval: f64, recording_duration: f64) -> Result<Self, ConfigError> {
        let config = Self {
            recording_interval,
            recording_duration,
            rewindable: true,
        };
        config.validate()?;
        Ok(config)
    }

    /// Number of snapshots needed to cover the whole recording duration.
    ///
    /// A tiny epsilon is removed before rounding up so that exact ratios such
    /// as `2.0 / 0.1` are not pushed to the next integer by float error.
    #[inline]
    pub fn snapshot_count(&self) -> usize {
        if self.recording_interval <= 0.0 || self.recording_duration <= 0.0 {
            return 0;
        }
        ((self.recording_duration / self.recording_interval) - 1e-9).ceil() as usize
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.recording_interval.is_finite() && self.recording_interval > 0.0) {
            return Err(ConfigError::InvalidRecordingInterval(self.recording_interval));
        }
        if !(self.recording_duration.is_finite() && self.recording_duration > 0.0) {
            return Err(ConfigError::InvalidRecordingDuration(self.recording_duration));
        }
        Ok(())
    }
}

/// Top-level timeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Recording parameters.
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Initial local time scale (1 = normal, 0 = paused, negative = rewind).
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,
    /// Name of the global clock this timeline follows, if any.
    #[serde(default)]
    pub global_clock: Option<String>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            recording: RecordingConfig::default(),
            time_scale: 1.0,
            global_clock: None,
        }
    }
}

impl TimelineConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.recording.validate()?;
        if !self.time_scale.is_finite() {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Recording interval must be positive (got {0})")]
    InvalidRecordingInterval(f64),
    #[error("Recording duration must be positive (got {0})")]
    InvalidRecordingDuration(f64),
    #[error("Time scale must be finite (got {0})")]
    InvalidTimeScale(f32),
}
