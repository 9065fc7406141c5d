//! Animator and legacy animation adapters.

use std::fmt;

use super::{AdapterError, Recordable, Tickable, record_or_replay};
use crate::engine::{Animation, Animator, CapabilityKind, ComponentId, ComponentRef};
use crate::recording::{Interpolate, Recorder};
use crate::schema::RecordingConfig;
use crate::timeline::Tick;

/// Engine component playing named clips at a speed.
pub trait ClipPlayer: fmt::Debug + 'static {
    const KIND: CapabilityKind;

    fn clip(&self) -> &str;

    /// Position within the active clip.
    fn clip_time(&self) -> f32;

    fn set_clip(&mut self, clip: &str, time: f32);

    fn speed(&self) -> f32;

    fn set_speed(&mut self, speed: f32);
}

impl ClipPlayer for Animator {
    const KIND: CapabilityKind = CapabilityKind::Animator;

    fn clip(&self) -> &str {
        &self.state
    }

    fn clip_time(&self) -> f32 {
        self.normalized_time
    }

    fn set_clip(&mut self, clip: &str, time: f32) {
        if self.state != clip {
            self.state = clip.to_string();
        }
        self.normalized_time = time;
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

impl ClipPlayer for Animation {
    const KIND: CapabilityKind = CapabilityKind::Animation;

    fn clip(&self) -> &str {
        &self.clip
    }

    fn clip_time(&self) -> f32 {
        self.time
    }

    fn set_clip(&mut self, clip: &str, time: f32) {
        if self.clip != clip {
            self.clip = clip.to_string();
        }
        self.time = time;
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

/// Recorded clip state.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipState {
    pub clip: String,
    pub time: f32,
}

impl Interpolate for ClipState {
    /// The clip is discrete; time only blends within the same clip.
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        if self.clip == other.clip {
            Self {
                clip: self.clip.clone(),
                time: self.time.interpolate(&other.time, t),
            }
        } else {
            self.clone()
        }
    }
}

/// Adapter scaling a clip player's speed and recording its progress.
#[derive(Debug)]
pub struct ClipAdapter<C: ClipPlayer> {
    component: ComponentRef<C>,
    recorder: Recorder<ClipState>,
    base_speed: f32,
}

pub type AnimatorAdapter = ClipAdapter<Animator>;
pub type AnimationAdapter = ClipAdapter<Animation>;

impl<C: ClipPlayer> ClipAdapter<C> {
    pub fn new(component: ComponentRef<C>, config: RecordingConfig) -> Self {
        Self {
            component,
            recorder: Recorder::new(config),
            base_speed: 1.0,
        }
    }

    pub fn recorder(&self) -> &Recorder<ClipState> {
        &self.recorder
    }

    /// Speed the component plays at under normal time.
    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }
}

impl<C: ClipPlayer> Tickable for ClipAdapter<C> {
    fn kind(&self) -> CapabilityKind {
        C::KIND
    }

    fn component_id(&self) -> ComponentId {
        self.component.id()
    }

    fn is_alive(&self) -> bool {
        self.component.is_alive()
    }

    fn adjust_properties(&mut self) -> Result<(), AdapterError> {
        self.base_speed = self.component.read(|player| player.speed())?;
        Ok(())
    }

    fn update(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        let speed = self.base_speed * tick.time_scale.max(0.0);
        self.component.write(|player| player.set_speed(speed))?;

        let component = &self.component;
        record_or_replay(
            &mut self.recorder,
            tick,
            || {
                component.read(|player| ClipState {
                    clip: player.clip().to_string(),
                    time: player.clip_time(),
                })
            },
            |state| component.write(|player| player.set_clip(&state.clip, state.time)),
        )
    }

    fn detach(&mut self) -> Result<(), AdapterError> {
        let speed = self.base_speed;
        self.component.write(|player| player.set_speed(speed))
    }
}

impl<C: ClipPlayer> Recordable for ClipAdapter<C> {
    fn snapshot_count(&self) -> usize {
        self.recorder.len()
    }

    fn estimate_memory_usage(&self) -> usize {
        self.recorder.estimate_memory_usage()
    }

    fn reset(&mut self) {
        self.recorder.reset();
    }

    fn reconfigure(&mut self, config: RecordingConfig) -> bool {
        self.recorder.reconfigure(config)
    }
}
