//! Transform adapter - records placement of objects without physics.

use glam::{Quat, Vec3};

use super::{AdapterError, Recordable, Tickable, record_or_replay};
use crate::engine::{CapabilityKind, ComponentId, ComponentRef, Transform};
use crate::recording::{Interpolate, Recorder};
use crate::schema::RecordingConfig;
use crate::timeline::Tick;

/// Recorded transform state.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Interpolate for TransformState {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.interpolate(&other.position, t),
            rotation: self.rotation.interpolate(&other.rotation, t),
            scale: self.scale.interpolate(&other.scale, t),
        }
    }
}

impl From<&Transform> for TransformState {
    fn from(transform: &Transform) -> Self {
        Self {
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
        }
    }
}

/// Positional fallback for objects with neither 3D nor 2D physics.
#[derive(Debug)]
pub struct TransformAdapter {
    component: ComponentRef<Transform>,
    recorder: Recorder<TransformState>,
}

impl TransformAdapter {
    pub fn new(component: ComponentRef<Transform>, config: RecordingConfig) -> Self {
        Self {
            component,
            recorder: Recorder::new(config),
        }
    }

    pub fn recorder(&self) -> &Recorder<TransformState> {
        &self.recorder
    }
}

impl Tickable for TransformAdapter {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Transform
    }

    fn component_id(&self) -> ComponentId {
        self.component.id()
    }

    fn is_alive(&self) -> bool {
        self.component.is_alive()
    }

    fn update(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        let component = &self.component;
        record_or_replay(
            &mut self.recorder,
            tick,
            || component.read(|transform| TransformState::from(transform)),
            |state| {
                component.write(|transform| {
                    transform.position = state.position;
                    transform.rotation = state.rotation;
                    transform.scale = state.scale;
                })
            },
        )
    }
}

impl Recordable for TransformAdapter {
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
