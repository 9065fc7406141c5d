//! Audio source adapter.

use super::{AdapterError, Tickable};
use crate::engine::{AudioSource, CapabilityKind, ComponentId, ComponentRef};
use crate::timeline::Tick;

/// Scales an audio source's pitch with time; negative scales play backwards.
///
/// At a scale of zero the source is paused, and resumed once time moves
/// again if it was the timeline that paused it.
#[derive(Debug)]
pub struct AudioSourceAdapter {
    component: ComponentRef<AudioSource>,
    base_pitch: f32,
    paused_by_timeline: bool,
}

impl AudioSourceAdapter {
    pub fn new(component: ComponentRef<AudioSource>) -> Self {
        Self {
            component,
            base_pitch: 1.0,
            paused_by_timeline: false,
        }
    }

    pub fn base_pitch(&self) -> f32 {
        self.base_pitch
    }
}

impl Tickable for AudioSourceAdapter {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::AudioSource
    }

    fn component_id(&self) -> ComponentId {
        self.component.id()
    }

    fn is_alive(&self) -> bool {
        self.component.is_alive()
    }

    fn adjust_properties(&mut self) -> Result<(), AdapterError> {
        self.base_pitch = self.component.read(|source| source.pitch)?;
        Ok(())
    }

    fn update(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        let time_scale = tick.time_scale;
        let base_pitch = self.base_pitch;
        let paused_by_timeline = self.paused_by_timeline;

        self.paused_by_timeline = self.component.write(|source| {
            if time_scale == 0.0 {
                if source.is_playing {
                    source.is_playing = false;
                    return true;
                }
                paused_by_timeline
            } else {
                if paused_by_timeline {
                    source.is_playing = true;
                }
                source.pitch = base_pitch * time_scale;
                false
            }
        })?;
        Ok(())
    }

    fn detach(&mut self) -> Result<(), AdapterError> {
        let base_pitch = self.base_pitch;
        let resume = self.paused_by_timeline;
        self.component.write(|source| {
            source.pitch = base_pitch;
            if resume {
                source.is_playing = true;
            }
        })?;
        self.paused_by_timeline = false;
        Ok(())
    }
}
