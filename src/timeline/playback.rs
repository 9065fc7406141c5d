//! The authoritative clock of one tracked object.

use std::fmt;

use super::SharedClock;
use crate::recording::TIME_EPSILON;
use crate::schema::{ConfigError, RecordingConfig, TimelineConfig};

/// How the timeline is currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Forward at a scale in (0, 1].
    Normal,
    /// Scale is zero.
    Paused,
    /// Scale is negative.
    Rewinding,
    /// Forward faster than real time.
    FastForward,
}

impl PlaybackMode {
    pub fn from_time_scale(time_scale: f32) -> Self {
        if time_scale < 0.0 {
            PlaybackMode::Rewinding
        } else if time_scale == 0.0 {
            PlaybackMode::Paused
        } else if time_scale > 1.0 {
            PlaybackMode::FastForward
        } else {
            PlaybackMode::Normal
        }
    }

    /// Check if time moves forward, i.e. new history is being written.
    #[inline]
    pub fn is_forward(self) -> bool {
        matches!(self, PlaybackMode::Normal | PlaybackMode::FastForward)
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackMode::Normal => "normal",
            PlaybackMode::Paused => "paused",
            PlaybackMode::Rewinding => "rewinding",
            PlaybackMode::FastForward => "fast-forward",
        };
        f.write_str(name)
    }
}

/// Timing information handed to every adapter for one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Playback position after this tick, in timeline seconds.
    pub time: f64,
    /// Playback position before this tick.
    pub previous_time: f64,
    /// Scaled, signed seconds elapsed on the timeline.
    pub delta_time: f32,
    /// Real seconds elapsed.
    pub unscaled_delta_time: f32,
    /// Effective scale (local times global).
    pub time_scale: f32,
    pub mode: PlaybackMode,
    /// True when the playback position is the newest time ever reached.
    pub at_live_edge: bool,
    /// Whether history is being kept at all.
    pub rewindable: bool,
}

impl Tick {
    /// Check if adapters should capture new snapshots.
    #[inline]
    pub fn is_recording(&self) -> bool {
        self.mode.is_forward()
    }

    /// Check if adapters should apply recorded state instead of the live one.
    #[inline]
    pub fn is_replaying(&self) -> bool {
        self.rewindable
            && match self.mode {
                PlaybackMode::Rewinding => true,
                PlaybackMode::Paused => !self.at_live_edge,
                _ => false,
            }
    }
}

/// Per-object clock: playback position, time scale and rewind bounds.
///
/// The timeline never rewinds past `live_time - recording_duration` since no
/// history exists there, and never past its start.
#[derive(Debug, Clone)]
pub struct Timeline {
    config: RecordingConfig,
    local_time_scale: f32,
    global_clock: Option<SharedClock>,
    time: f64,
    live_time: f64,
    rewind_exhausted: bool,
}

impl Timeline {
    /// Create a timeline at time zero.
    pub fn new(config: &TimelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.recording,
            local_time_scale: config.time_scale,
            global_clock: None,
            time: 0.0,
            live_time: 0.0,
            rewind_exhausted: false,
        })
    }

    /// Follow a global clock; its scale multiplies the local one.
    pub fn with_global_clock(mut self, clock: SharedClock) -> Self {
        self.global_clock = Some(clock);
        self
    }

    pub fn set_global_clock(&mut self, clock: Option<SharedClock>) {
        self.global_clock = clock;
    }

    pub fn global_clock(&self) -> Option<&SharedClock> {
        self.global_clock.as_ref()
    }

    /// Get the recording configuration.
    pub fn recording_config(&self) -> &RecordingConfig {
        &self.config
    }

    /// Replace the recording configuration after validating it.
    ///
    /// Callers are responsible for resetting recorders; see
    /// [`Effector::set_recording_config`](crate::effector::Effector::set_recording_config).
    pub fn set_recording_config(&mut self, config: RecordingConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Check if history is retained.
    #[inline]
    pub fn is_rewindable(&self) -> bool {
        self.config.rewindable
    }

    pub fn local_time_scale(&self) -> f32 {
        self.local_time_scale
    }

    /// Set the local time scale: 1 normal, 0 paused, negative rewinds.
    pub fn set_time_scale(&mut self, time_scale: f32) -> Result<(), ConfigError> {
        if !time_scale.is_finite() {
            return Err(ConfigError::InvalidTimeScale(time_scale));
        }
        if time_scale < 0.0 && !self.config.rewindable {
            log::warn!("Timeline is not rewindable; negative time scale will hold position");
        }
        self.local_time_scale = time_scale;
        self.rewind_exhausted = false;
        Ok(())
    }

    /// Effective time scale including the global clock.
    pub fn time_scale(&self) -> f32 {
        let global = self
            .global_clock
            .as_ref()
            .map_or(1.0, |clock| clock.borrow().time_scale());
        self.local_time_scale * global
    }

    pub fn mode(&self) -> PlaybackMode {
        PlaybackMode::from_time_scale(self.time_scale())
    }

    /// Current playback position in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Newest time reached while playing forward.
    #[inline]
    pub fn live_time(&self) -> f64 {
        self.live_time
    }

    /// Check if the playback position is the newest recorded time.
    #[inline]
    pub fn is_at_live_edge(&self) -> bool {
        self.time >= self.live_time - TIME_EPSILON
    }

    /// Earliest position the timeline can rewind to.
    pub fn rewind_floor(&self) -> f64 {
        if !self.config.rewindable {
            return self.live_time;
        }
        (self.live_time - self.config.recording_duration).max(0.0)
    }

    /// Check if the last rewind hit the floor.
    pub fn is_rewind_exhausted(&self) -> bool {
        self.rewind_exhausted
    }

    /// Advance the clock by `delta` real seconds.
    pub fn advance(&mut self, delta: f32) -> Tick {
        let time_scale = self.time_scale();
        let delta_time = delta * time_scale;
        let previous_time = self.time;
        let mut time = previous_time + f64::from(delta_time);

        if time_scale < 0.0 {
            let floor = self.rewind_floor();
            if time < floor {
                time = floor;
                if !self.rewind_exhausted {
                    log::debug!("Rewind reached the oldest retained time {:.3}s", floor);
                    self.rewind_exhausted = true;
                }
            }
        } else if time_scale > 0.0 {
            if self.time < self.live_time - TIME_EPSILON {
                log::debug!(
                    "Resuming at {:.3}s discards {:.3}s of recorded future",
                    self.time,
                    self.live_time - self.time
                );
            }
            self.live_time = time;
        }
        self.time = time;

        self.tick(previous_time, delta, delta_time, time_scale)
    }

    /// Timing for a physics step of `fixed_delta` real seconds.
    ///
    /// The playback position is driven by [`advance`](Self::advance) only.
    pub fn fixed_tick(&self, fixed_delta: f32) -> Tick {
        let time_scale = self.time_scale();
        self.tick(self.time, fixed_delta, fixed_delta * time_scale, time_scale)
    }

    /// Jump to a past position and hold there.
    ///
    /// The target is clamped to the retained range and the local scale is set
    /// to zero. Returns the position actually reached.
    pub fn rewind_to(&mut self, target: f64) -> f64 {
        let floor = self.rewind_floor();
        let clamped = if target.is_nan() {
            self.time
        } else {
            target.clamp(floor, self.live_time)
        };
        self.time = clamped;
        self.local_time_scale = 0.0;
        self.rewind_exhausted = false;
        clamped
    }

    fn tick(&self, previous_time: f64, unscaled: f32, delta_time: f32, time_scale: f32) -> Tick {
        Tick {
            time: self.time,
            previous_time,
            delta_time,
            unscaled_delta_time: unscaled,
            time_scale,
            mode: PlaybackMode::from_time_scale(time_scale),
            at_live_edge: self.is_at_live_edge(),
            rewindable: self.config.rewindable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::GlobalClock;
    use approx::assert_relative_eq;

    fn timeline(interval: f64, duration: f64) -> Timeline {
        let config = TimelineConfig {
            recording: RecordingConfig::new(interval, duration).unwrap(),
            ..Default::default()
        };
        Timeline::new(&config).unwrap()
    }

    #[test]
    fn test_mode_from_scale() {
        assert_eq!(PlaybackMode::from_time_scale(1.0), PlaybackMode::Normal);
        assert_eq!(PlaybackMode::from_time_scale(0.25), PlaybackMode::Normal);
        assert_eq!(PlaybackMode::from_time_scale(0.0), PlaybackMode::Paused);
        assert_eq!(PlaybackMode::from_time_scale(-1.0), PlaybackMode::Rewinding);
        assert_eq!(PlaybackMode::from_time_scale(3.0), PlaybackMode::FastForward);
    }

    #[test]
    fn test_advance_forward_moves_live_edge() {
        let mut timeline = timeline(0.5, 2.0);
        let tick = timeline.advance(0.5);
        assert_relative_eq!(tick.time, 0.5);
        assert!(tick.at_live_edge);
        assert!(tick.is_recording());
        assert_relative_eq!(timeline.live_time(), 0.5);
    }

    #[test]
    fn test_rewind_clamps_to_floor() {
        let mut timeline = timeline(0.5, 2.0);
        for _ in 0..10 {
            timeline.advance(0.5);
        }
        assert_relative_eq!(timeline.time(), 5.0);

        timeline.set_time_scale(-1.0).unwrap();
        let tick = timeline.advance(1.0);
        assert_eq!(tick.mode, PlaybackMode::Rewinding);
        assert!(tick.is_replaying());
        assert!(!tick.at_live_edge);
        assert_relative_eq!(tick.time, 4.0);

        let tick = timeline.advance(5.0);
        assert_relative_eq!(tick.time, 3.0);
        assert!(timeline.is_rewind_exhausted());
    }

    #[test]
    fn test_resume_discards_future() {
        let mut timeline = timeline(0.5, 10.0);
        timeline.advance(4.0);
        assert_relative_eq!(timeline.rewind_to(1.5), 1.5);
        assert_eq!(timeline.mode(), PlaybackMode::Paused);
        let paused = timeline.advance(1.0);
        assert!(paused.is_replaying());
        assert_relative_eq!(paused.time, 1.5);

        timeline.set_time_scale(1.0).unwrap();
        let tick = timeline.advance(0.5);
        assert_relative_eq!(tick.time, 2.0);
        assert_relative_eq!(timeline.live_time(), 2.0);
        assert!(tick.at_live_edge);
    }

    #[test]
    fn test_rewind_to_clamps_both_ways() {
        let mut timeline = timeline(0.5, 2.0);
        timeline.advance(3.0);
        assert_relative_eq!(timeline.rewind_to(-10.0), 1.0);
        assert_relative_eq!(timeline.rewind_to(50.0), 3.0);
    }

    #[test]
    fn test_global_clock_multiplies() {
        let clock = GlobalClock::new("world").shared();
        let mut timeline = timeline(0.5, 2.0).with_global_clock(clock.clone());
        timeline.set_time_scale(0.5).unwrap();
        clock.borrow_mut().set_time_scale(4.0);
        assert_relative_eq!(timeline.time_scale(), 2.0);
        assert_eq!(timeline.mode(), PlaybackMode::FastForward);

        clock.borrow_mut().pause();
        let tick = timeline.advance(1.0);
        assert_eq!(tick.mode, PlaybackMode::Paused);
        assert!(!tick.is_replaying());
    }

    #[test]
    fn test_not_rewindable_holds_position() {
        let config = TimelineConfig {
            recording: RecordingConfig {
                rewindable: false,
                ..RecordingConfig::default()
            },
            ..Default::default()
        };
        let mut timeline = Timeline::new(&config).unwrap();
        timeline.advance(2.0);
        timeline.set_time_scale(-1.0).unwrap();
        let tick = timeline.advance(1.0);
        assert_relative_eq!(tick.time, 2.0);
        assert!(!tick.is_replaying());
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = TimelineConfig {
            recording: RecordingConfig {
                recording_interval: 0.0,
                ..RecordingConfig::default()
            },
            ..Default::default()
        };
        assert!(Timeline::new(&config).is_err());

        let mut timeline = timeline(0.5, 2.0);
        assert!(timeline.set_time_scale(f32::INFINITY).is_err());
    }
}
