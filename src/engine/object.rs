//! Capability queries and an in-memory host object.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3};

use super::components::*;
use super::{CapabilityKind, ComponentId, ComponentRef};

/// Gravity applied by [`SceneObject::step`] to bodies using engine gravity.
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Capability queries a host object answers during reconciliation.
///
/// Each query returns a handle to the live component of that kind, or `None`
/// when the object does not have one. Hosts only override the queries for
/// capabilities they support.
pub trait EngineObject {
    fn rigid_body_3d(&self) -> Option<ComponentRef<RigidBody3D>> {
        None
    }

    fn rigid_body_2d(&self) -> Option<ComponentRef<RigidBody2D>> {
        None
    }

    fn transform(&self) -> Option<ComponentRef<Transform>> {
        None
    }

    fn animator(&self) -> Option<ComponentRef<Animator>> {
        None
    }

    fn animation(&self) -> Option<ComponentRef<Animation>> {
        None
    }

    /// All live audio sources, in host order.
    fn audio_sources(&self) -> Vec<ComponentRef<AudioSource>> {
        Vec::new()
    }

    fn particle_system(&self) -> Option<ComponentRef<ParticleSystem>> {
        None
    }

    fn nav_mesh_agent(&self) -> Option<ComponentRef<NavMeshAgent>> {
        None
    }

    fn wind_zone(&self) -> Option<ComponentRef<WindZone>> {
        None
    }
}

#[derive(Debug)]
struct Slot<T> {
    id: ComponentId,
    component: Rc<RefCell<T>>,
}

impl<T> Slot<T> {
    fn handle(&self, kind: CapabilityKind) -> ComponentRef<T> {
        ComponentRef::new(self.id, kind, &self.component)
    }
}

/// Generates insert/remove/get accessors for a single-instance component slot.
macro_rules! single_component {
    ($field:ident, $ty:ty, $insert:ident, $remove:ident) => {
        /// Attach a component, replacing any existing one of the same kind.
        pub fn $insert(&mut self, component: $ty) -> Rc<RefCell<$ty>> {
            let id = self.allocate_id();
            let component = Rc::new(RefCell::new(component));
            self.$field = Some(Slot {
                id,
                component: Rc::clone(&component),
            });
            component
        }

        /// Destroy the component. Returns false if there was none.
        pub fn $remove(&mut self) -> bool {
            self.$field.take().is_some()
        }
    };
}

/// Minimal host object owning its components.
///
/// Used by the demo binary and tests; real hosts implement [`EngineObject`]
/// over their own component storage.
#[derive(Debug, Default)]
pub struct SceneObject {
    name: String,
    next_id: u64,
    transform: Option<Slot<Transform>>,
    rigid_body_3d: Option<Slot<RigidBody3D>>,
    rigid_body_2d: Option<Slot<RigidBody2D>>,
    animator: Option<Slot<Animator>>,
    animation: Option<Slot<Animation>>,
    audio_sources: Vec<Slot<AudioSource>>,
    particle_system: Option<Slot<ParticleSystem>>,
    nav_mesh_agent: Option<Slot<NavMeshAgent>>,
    wind_zone: Option<Slot<WindZone>>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn allocate_id(&mut self) -> ComponentId {
        self.next_id += 1;
        ComponentId(self.next_id)
    }

    single_component!(transform, Transform, insert_transform, remove_transform);
    single_component!(rigid_body_3d, RigidBody3D, insert_rigid_body_3d, remove_rigid_body_3d);
    single_component!(rigid_body_2d, RigidBody2D, insert_rigid_body_2d, remove_rigid_body_2d);
    single_component!(animator, Animator, insert_animator, remove_animator);
    single_component!(animation, Animation, insert_animation, remove_animation);
    single_component!(particle_system, ParticleSystem, insert_particle_system, remove_particle_system);
    single_component!(nav_mesh_agent, NavMeshAgent, insert_nav_mesh_agent, remove_nav_mesh_agent);
    single_component!(wind_zone, WindZone, insert_wind_zone, remove_wind_zone);

    /// Attach another audio source. Returns its id and shared state.
    pub fn add_audio_source(&mut self, source: AudioSource) -> (ComponentId, Rc<RefCell<AudioSource>>) {
        let id = self.allocate_id();
        let component = Rc::new(RefCell::new(source));
        self.audio_sources.push(Slot {
            id,
            component: Rc::clone(&component),
        });
        (id, component)
    }

    /// Destroy an audio source. Returns false if the id is unknown.
    pub fn remove_audio_source(&mut self, id: ComponentId) -> bool {
        let before = self.audio_sources.len();
        self.audio_sources.retain(|slot| slot.id != id);
        self.audio_sources.len() != before
    }

    /// Advance host-side simulation by `dt` real seconds.
    ///
    /// Integrates non-kinematic bodies, advances animation, audio and particle
    /// clocks at their current speeds, and services particle re-simulation
    /// requests.
    pub fn step(&self, dt: f32) {
        if let Some(slot) = &self.rigid_body_3d {
            let mut guard = slot.component.borrow_mut();
            let body = &mut *guard;
            if !body.is_kinematic {
                if body.use_gravity {
                    body.velocity += GRAVITY * dt;
                }
                body.position += body.velocity * dt;
                let spin = body.angular_velocity * dt;
                if spin.length_squared() > 0.0 {
                    body.rotation = (Quat::from_scaled_axis(spin) * body.rotation).normalize();
                }
            }
        }
        if let Some(slot) = &self.rigid_body_2d {
            let mut guard = slot.component.borrow_mut();
            let body = &mut *guard;
            if !body.is_kinematic {
                body.velocity += GRAVITY.truncate() * body.gravity_scale * dt;
                body.position += body.velocity * dt;
                body.rotation += body.angular_velocity * dt;
            }
        }
        if let Some(slot) = &self.animator {
            let mut guard = slot.component.borrow_mut();
            let animator = &mut *guard;
            animator.normalized_time += animator.speed * dt;
        }
        if let Some(slot) = &self.animation {
            let mut guard = slot.component.borrow_mut();
            let animation = &mut *guard;
            animation.time += animation.speed * dt;
        }
        for slot in &self.audio_sources {
            let mut guard = slot.component.borrow_mut();
            let source = &mut *guard;
            if source.is_playing {
                source.time = (source.time + source.pitch * dt).max(0.0);
            }
        }
        if let Some(slot) = &self.particle_system {
            let mut guard = slot.component.borrow_mut();
            let particles = &mut *guard;
            if let Some(target) = particles.simulate_to.take() {
                particles.time = target;
            } else if particles.is_playing {
                particles.time += particles.playback_speed * dt;
            }
        }
    }
}

impl EngineObject for SceneObject {
    fn rigid_body_3d(&self) -> Option<ComponentRef<RigidBody3D>> {
        self.rigid_body_3d
            .as_ref()
            .map(|slot| slot.handle(CapabilityKind::Motion3D))
    }

    fn rigid_body_2d(&self) -> Option<ComponentRef<RigidBody2D>> {
        self.rigid_body_2d
            .as_ref()
            .map(|slot| slot.handle(CapabilityKind::Motion2D))
    }

    fn transform(&self) -> Option<ComponentRef<Transform>> {
        self.transform
            .as_ref()
            .map(|slot| slot.handle(CapabilityKind::Transform))
    }

    fn animator(&self) -> Option<ComponentRef<Animator>> {
        self.animator
            .as_ref()
            .map(|slot| slot.handle(CapabilityKind::Animator))
    }

    fn animation(&self) -> Option<ComponentRef<Animation>> {
        self.animation
            .as_ref()
            .map(|slot| slot.handle(CapabilityKind::Animation))
    }

    fn audio_sources(&self) -> Vec<ComponentRef<AudioSource>> {
        self.audio_sources
            .iter()
            .map(|slot| slot.handle(CapabilityKind::AudioSource))
            .collect()
    }

    fn particle_system(&self) -> Option<ComponentRef<ParticleSystem>> {
        self.particle_system
            .as_ref()
            .map(|slot| slot.handle(CapabilityKind::ParticleSystem))
    }

    fn nav_mesh_agent(&self) -> Option<ComponentRef<NavMeshAgent>> {
        self.nav_mesh_agent
            .as_ref()
            .map(|slot| slot.handle(CapabilityKind::NavMeshAgent))
    }

    fn wind_zone(&self) -> Option<ComponentRef<WindZone>> {
        self.wind_zone
            .as_ref()
            .map(|slot| slot.handle(CapabilityKind::WindZone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_follow_composition() {
        let mut object = SceneObject::new("crate");
        assert!(object.rigid_body_3d().is_none());

        let body = object.insert_rigid_body_3d(RigidBody3D::default());
        let handle = object.rigid_body_3d().unwrap();
        assert_eq!(handle.kind(), CapabilityKind::Motion3D);
        assert!(handle.is_alive());

        drop(body);
        assert!(object.remove_rigid_body_3d());
        assert!(!handle.is_alive());
        assert!(object.rigid_body_3d().is_none());
    }

    #[test]
    fn test_component_ids_are_unique() {
        let mut object = SceneObject::new("speaker");
        let (a, _) = object.add_audio_source(AudioSource::default());
        let (b, _) = object.add_audio_source(AudioSource::default());
        assert_ne!(a, b);
        assert!(object.remove_audio_source(a));
        assert!(!object.remove_audio_source(a));
        let ids: Vec<_> = object.audio_sources().iter().map(ComponentRef::id).collect();
        assert_eq!(ids, vec![b]);
    }

    #[test]
    fn test_step_integrates_bodies() {
        let mut object = SceneObject::new("ball");
        let body = object.insert_rigid_body_3d(RigidBody3D {
            velocity: Vec3::X,
            use_gravity: false,
            ..Default::default()
        });
        object.step(0.5);
        assert_eq!(body.borrow().position, Vec3::new(0.5, 0.0, 0.0));

        body.borrow_mut().is_kinematic = true;
        object.step(0.5);
        assert_eq!(body.borrow().position, Vec3::new(0.5, 0.0, 0.0));
    }
}
