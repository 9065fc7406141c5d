//! Rigid body adapters for 3D and 2D physics.
//!
//! Bodies are recorded with their velocities divided by the time scale, so a
//! snapshot taken in slow motion resumes at the right speed under any other
//! scale. While paused or rewinding the body is made kinematic and driven
//! from the recorder; the velocity it had is restored when time moves forward
//! again. The adapter takes over gravity from the engine so it can be scaled.

use std::fmt;

use glam::{Quat, Vec2, Vec3};

use super::{AdapterError, Recordable, Tickable, record_or_replay};
use crate::engine::{CapabilityKind, ComponentId, ComponentRef, GRAVITY, RigidBody2D, RigidBody3D};
use crate::recording::{Interpolate, Recorder, lerp_angle_degrees};
use crate::schema::RecordingConfig;
use crate::timeline::Tick;

/// Engine-side rigid body the motion adapter can drive.
pub trait Body: fmt::Debug + 'static {
    /// Recorded state: pose plus unscaled velocities.
    type State: Interpolate + fmt::Debug;

    const KIND: CapabilityKind;

    /// Capture the state, dividing velocities by `time_scale`.
    fn capture(&self, time_scale: f32) -> Self::State;

    fn apply_pose(&mut self, state: &Self::State);

    /// Set velocities from unscaled recorded ones.
    fn apply_velocity(&mut self, state: &Self::State, time_scale: f32);

    fn scale_velocity(&mut self, factor: f32);

    fn is_kinematic(&self) -> bool;

    fn set_kinematic(&mut self, kinematic: bool);

    /// Disable engine gravity, returning the gravity factor it applied.
    fn take_gravity(&mut self) -> f32;

    /// Re-enable engine gravity taken by [`take_gravity`](Self::take_gravity).
    fn restore_gravity(&mut self, factor: f32);

    /// Add `GRAVITY * factor * dt` to the velocity.
    fn add_gravity(&mut self, factor: f32, dt: f32);
}

/// Recorded 3D body state.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion3DState {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Interpolate for Motion3DState {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.interpolate(&other.position, t),
            rotation: self.rotation.interpolate(&other.rotation, t),
            velocity: self.velocity.interpolate(&other.velocity, t),
            angular_velocity: self.angular_velocity.interpolate(&other.angular_velocity, t),
        }
    }
}

/// Recorded 2D body state. Rotation in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion2DState {
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
}

impl Interpolate for Motion2DState {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.interpolate(&other.position, t),
            rotation: lerp_angle_degrees(self.rotation, other.rotation, t),
            velocity: self.velocity.interpolate(&other.velocity, t),
            angular_velocity: self.angular_velocity.interpolate(&other.angular_velocity, t),
        }
    }
}

#[inline]
fn inverse_scale(time_scale: f32) -> f32 {
    if time_scale > 0.0 { 1.0 / time_scale } else { 1.0 }
}

impl Body for RigidBody3D {
    type State = Motion3DState;

    const KIND: CapabilityKind = CapabilityKind::Motion3D;

    fn capture(&self, time_scale: f32) -> Motion3DState {
        let inverse = inverse_scale(time_scale);
        Motion3DState {
            position: self.position,
            rotation: self.rotation,
            velocity: self.velocity * inverse,
            angular_velocity: self.angular_velocity * inverse,
        }
    }

    fn apply_pose(&mut self, state: &Motion3DState) {
        self.position = state.position;
        self.rotation = state.rotation;
    }

    fn apply_velocity(&mut self, state: &Motion3DState, time_scale: f32) {
        self.velocity = state.velocity * time_scale;
        self.angular_velocity = state.angular_velocity * time_scale;
    }

    fn scale_velocity(&mut self, factor: f32) {
        self.velocity *= factor;
        self.angular_velocity *= factor;
    }

    fn is_kinematic(&self) -> bool {
        self.is_kinematic
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.is_kinematic = kinematic;
    }

    fn take_gravity(&mut self) -> f32 {
        let factor = if self.use_gravity { 1.0 } else { 0.0 };
        self.use_gravity = false;
        factor
    }

    fn restore_gravity(&mut self, factor: f32) {
        self.use_gravity = factor != 0.0;
    }

    fn add_gravity(&mut self, factor: f32, dt: f32) {
        self.velocity += GRAVITY * factor * dt;
    }
}

impl Body for RigidBody2D {
    type State = Motion2DState;

    const KIND: CapabilityKind = CapabilityKind::Motion2D;

    fn capture(&self, time_scale: f32) -> Motion2DState {
        let inverse = inverse_scale(time_scale);
        Motion2DState {
            position: self.position,
            rotation: self.rotation,
            velocity: self.velocity * inverse,
            angular_velocity: self.angular_velocity * inverse,
        }
    }

    fn apply_pose(&mut self, state: &Motion2DState) {
        self.position = state.position;
        self.rotation = state.rotation;
    }

    fn apply_velocity(&mut self, state: &Motion2DState, time_scale: f32) {
        self.velocity = state.velocity * time_scale;
        self.angular_velocity = state.angular_velocity * time_scale;
    }

    fn scale_velocity(&mut self, factor: f32) {
        self.velocity *= factor;
        self.angular_velocity *= factor;
    }

    fn is_kinematic(&self) -> bool {
        self.is_kinematic
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.is_kinematic = kinematic;
    }

    fn take_gravity(&mut self) -> f32 {
        let factor = self.gravity_scale;
        self.gravity_scale = 0.0;
        factor
    }

    fn restore_gravity(&mut self, factor: f32) {
        self.gravity_scale = factor;
    }

    fn add_gravity(&mut self, factor: f32, dt: f32) {
        self.velocity += GRAVITY.truncate() * factor * dt;
    }
}

/// Adapter recording a rigid body.
#[derive(Debug)]
pub struct MotionAdapter<B: Body> {
    component: ComponentRef<B>,
    recorder: Recorder<B::State>,
    gravity_factor: f32,
    was_kinematic: bool,
    last_time_scale: f32,
    /// Unscaled state restored when time moves forward again.
    stashed: Option<B::State>,
}

pub type Motion3DAdapter = MotionAdapter<RigidBody3D>;
pub type Motion2DAdapter = MotionAdapter<RigidBody2D>;

impl<B: Body> MotionAdapter<B> {
    pub fn new(component: ComponentRef<B>, config: RecordingConfig) -> Self {
        Self {
            component,
            recorder: Recorder::new(config),
            gravity_factor: 0.0,
            was_kinematic: false,
            last_time_scale: 1.0,
            stashed: None,
        }
    }

    pub fn recorder(&self) -> &Recorder<B::State> {
        &self.recorder
    }

    /// Gravity factor taken over from the engine.
    pub fn gravity_factor(&self) -> f32 {
        self.gravity_factor
    }

    fn apply_time_scale(&mut self, time_scale: f32) -> Result<(), AdapterError> {
        let previous = self.last_time_scale;
        if time_scale == previous {
            return Ok(());
        }

        match (previous > 0.0, time_scale > 0.0) {
            (true, true) => {
                self.component
                    .write(|body| body.scale_velocity(time_scale / previous))?;
            }
            (true, false) => {
                let state = self.component.write(|body| {
                    let state = body.capture(previous);
                    body.set_kinematic(true);
                    state
                })?;
                self.stashed = Some(state);
            }
            (false, true) => {
                let kinematic = self.was_kinematic;
                let stashed = self.stashed.take();
                self.component.write(|body| {
                    body.set_kinematic(kinematic);
                    if let Some(state) = &stashed {
                        body.apply_velocity(state, time_scale);
                    }
                })?;
            }
            (false, false) => {}
        }

        self.last_time_scale = time_scale;
        Ok(())
    }
}

impl<B: Body> Tickable for MotionAdapter<B> {
    fn kind(&self) -> CapabilityKind {
        B::KIND
    }

    fn component_id(&self) -> ComponentId {
        self.component.id()
    }

    fn is_alive(&self) -> bool {
        self.component.is_alive()
    }

    fn adjust_properties(&mut self) -> Result<(), AdapterError> {
        let (gravity_factor, was_kinematic) = self
            .component
            .write(|body| (body.take_gravity(), body.is_kinematic()))?;
        self.gravity_factor = gravity_factor;
        self.was_kinematic = was_kinematic;
        Ok(())
    }

    fn start(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        // Engine velocities are authored at normal speed
        self.last_time_scale = 1.0;
        self.apply_time_scale(tick.time_scale)
    }

    fn update(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        self.apply_time_scale(tick.time_scale)?;

        let component = &self.component;
        let stashed = &mut self.stashed;
        record_or_replay(
            &mut self.recorder,
            tick,
            || component.read(|body| body.capture(tick.time_scale)),
            |state| {
                component.write(|body| body.apply_pose(&state))?;
                *stashed = Some(state);
                Ok(())
            },
        )
    }

    fn fixed_update(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        if !tick.mode.is_forward() || self.gravity_factor == 0.0 {
            return Ok(());
        }
        let factor = self.gravity_factor;
        let dt = tick.unscaled_delta_time * tick.time_scale * tick.time_scale;
        self.component.write(|body| body.add_gravity(factor, dt))
    }

    fn detach(&mut self) -> Result<(), AdapterError> {
        let gravity_factor = self.gravity_factor;
        let kinematic = self.was_kinematic;
        let last_time_scale = self.last_time_scale;
        let stashed = self.stashed.take();
        self.component.write(|body| {
            body.restore_gravity(gravity_factor);
            body.set_kinematic(kinematic);
            // Leave the body moving at normal speed
            if last_time_scale > 0.0 {
                body.scale_velocity(1.0 / last_time_scale);
            } else if let Some(state) = &stashed {
                body.apply_velocity(state, 1.0);
            }
        })?;
        self.last_time_scale = 1.0;
        Ok(())
    }
}

impl<B: Body> Recordable for MotionAdapter<B> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::tick;
    use crate::engine::{EngineObject, SceneObject};
    use approx::assert_relative_eq;

    fn body_3d() -> (SceneObject, std::rc::Rc<std::cell::RefCell<RigidBody3D>>, Motion3DAdapter) {
        let mut object = SceneObject::new("ball");
        let body = object.insert_rigid_body_3d(RigidBody3D {
            velocity: Vec3::new(2.0, 0.0, 0.0),
            ..Default::default()
        });
        let adapter = Motion3DAdapter::new(
            object.rigid_body_3d().unwrap(),
            RecordingConfig::new(0.5, 10.0).unwrap(),
        );
        (object, body, adapter)
    }

    #[test]
    fn test_takes_over_gravity() {
        let (_object, body, mut adapter) = body_3d();
        adapter.adjust_properties().unwrap();
        assert!(!body.borrow().use_gravity);
        assert_eq!(adapter.gravity_factor(), 1.0);

        adapter.start(&tick(0.0, 1.0, true)).unwrap();
        let mut step = tick(0.0, 0.5, true);
        step.unscaled_delta_time = 1.0;
        adapter.fixed_update(&step).unwrap();
        // Quarter gravity at half speed
        assert_relative_eq!(body.borrow().velocity.y, -9.81 * 0.25, epsilon = 1e-5);
    }

    #[test]
    fn test_slow_motion_scales_velocity() {
        let (_object, body, mut adapter) = body_3d();
        adapter.adjust_properties().unwrap();
        adapter.start(&tick(0.0, 1.0, true)).unwrap();

        adapter.update(&tick(0.0, 0.5, true)).unwrap();
        assert_relative_eq!(body.borrow().velocity.x, 1.0);
        // Recorded unscaled
        let recorded = adapter.recorder().sample(0.0).unwrap();
        assert_relative_eq!(recorded.velocity.x, 2.0);

        adapter.update(&tick(0.1, 1.0, true)).unwrap();
        assert_relative_eq!(body.borrow().velocity.x, 2.0);
    }

    #[test]
    fn test_rewind_freezes_and_resumes() {
        let (_object, body, mut adapter) = body_3d();
        adapter.adjust_properties().unwrap();
        adapter.start(&tick(0.0, 1.0, true)).unwrap();

        for i in 0..3 {
            body.borrow_mut().position.x = i as f32;
            adapter.update(&tick(i as f64 * 0.5, 1.0, true)).unwrap();
        }

        body.borrow_mut().velocity = Vec3::new(9.0, 0.0, 0.0);
        adapter.update(&tick(0.25, -1.0, false)).unwrap();
        {
            let body = body.borrow();
            assert!(body.is_kinematic);
            assert_relative_eq!(body.position.x, 0.5);
        }

        adapter.update(&tick(0.35, 1.0, true)).unwrap();
        let body = body.borrow();
        assert!(!body.is_kinematic);
        // Velocity of the sampled state, not the one before rewinding
        assert_relative_eq!(body.velocity.x, 2.0);
        assert_eq!(adapter.snapshot_count(), 1);
    }

    #[test]
    fn test_detach_returns_body_to_engine() {
        let (_object, body, mut adapter) = body_3d();
        adapter.adjust_properties().unwrap();
        adapter.start(&tick(0.0, 1.0, true)).unwrap();
        adapter.update(&tick(0.0, 1.0, true)).unwrap();
        adapter.update(&tick(0.1, 0.0, true)).unwrap();
        body.borrow_mut().velocity = Vec3::ZERO;
        assert!(body.borrow().is_kinematic);

        adapter.detach().unwrap();
        let body = body.borrow();
        assert!(body.use_gravity);
        assert!(!body.is_kinematic);
        assert_relative_eq!(body.velocity.x, 2.0);
    }

    #[test]
    fn test_detach_unscales_velocity() {
        let (_object, body, mut adapter) = body_3d();
        adapter.adjust_properties().unwrap();
        adapter.start(&tick(0.0, 0.5, true)).unwrap();
        assert_relative_eq!(body.borrow().velocity.x, 1.0);

        adapter.detach().unwrap();
        assert_relative_eq!(body.borrow().velocity.x, 2.0);
    }

    #[test]
    fn test_motion_2d_rotation_wraps() {
        let mut object = SceneObject::new("crate");
        let body = object.insert_rigid_body_2d(RigidBody2D {
            rotation: 350.0,
            ..Default::default()
        });
        let mut adapter = Motion2DAdapter::new(
            object.rigid_body_2d().unwrap(),
            RecordingConfig::new(0.5, 10.0).unwrap(),
        );
        adapter.adjust_properties().unwrap();
        assert_eq!(body.borrow().gravity_scale, 0.0);
        adapter.start(&tick(0.0, 1.0, true)).unwrap();

        adapter.update(&tick(0.0, 1.0, true)).unwrap();
        body.borrow_mut().rotation = 10.0;
        adapter.update(&tick(0.5, 1.0, true)).unwrap();

        adapter.update(&tick(0.25, 0.0, false)).unwrap();
        assert_relative_eq!(body.borrow().rotation, 360.0);
    }
}
