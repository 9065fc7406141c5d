//! Particle system adapters.
//!
//! Rewindable particles are re-simulated from a fixed seed up to the
//! timeline's position every tick, so they follow rewinds without storing
//! history. Non-rewindable particles only have their playback speed scaled.

use super::{AdapterError, Tickable};
use crate::engine::{CapabilityKind, ComponentId, ComponentRef, ParticleSystem};
use crate::timeline::Tick;

/// Particle adapter variant, chosen once at construction.
#[derive(Debug)]
pub enum ParticleAdapter {
    Rewindable(RewindableParticles),
    NonRewindable(ScaledParticles),
}

impl ParticleAdapter {
    /// Build the variant matching the owning timeline's `rewindable` flag.
    pub fn new(component: ComponentRef<ParticleSystem>, rewindable: bool) -> Self {
        if rewindable {
            ParticleAdapter::Rewindable(RewindableParticles::new(component))
        } else {
            ParticleAdapter::NonRewindable(ScaledParticles::new(component))
        }
    }

    pub fn is_rewindable(&self) -> bool {
        matches!(self, ParticleAdapter::Rewindable(_))
    }

    fn inner(&self) -> &dyn Tickable {
        match self {
            ParticleAdapter::Rewindable(adapter) => adapter,
            ParticleAdapter::NonRewindable(adapter) => adapter,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Tickable {
        match self {
            ParticleAdapter::Rewindable(adapter) => adapter,
            ParticleAdapter::NonRewindable(adapter) => adapter,
        }
    }
}

impl Tickable for ParticleAdapter {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::ParticleSystem
    }

    fn component_id(&self) -> ComponentId {
        self.inner().component_id()
    }

    fn is_alive(&self) -> bool {
        self.inner().is_alive()
    }

    fn adjust_properties(&mut self) -> Result<(), AdapterError> {
        self.inner_mut().adjust_properties()
    }

    fn start(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        self.inner_mut().start(tick)
    }

    fn update(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        self.inner_mut().update(tick)
    }

    fn detach(&mut self) -> Result<(), AdapterError> {
        self.inner_mut().detach()
    }
}

/// Drives particle time from the timeline position.
#[derive(Debug)]
pub struct RewindableParticles {
    component: ComponentRef<ParticleSystem>,
    /// Particle time when the adapter started.
    base_time: f32,
    /// Timeline position when the adapter started.
    origin: f64,
}

impl RewindableParticles {
    pub fn new(component: ComponentRef<ParticleSystem>) -> Self {
        Self {
            component,
            base_time: 0.0,
            origin: 0.0,
        }
    }
}

impl Tickable for RewindableParticles {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::ParticleSystem
    }

    fn component_id(&self) -> ComponentId {
        self.component.id()
    }

    fn is_alive(&self) -> bool {
        self.component.is_alive()
    }

    fn adjust_properties(&mut self) -> Result<(), AdapterError> {
        self.base_time = self.component.write(|particles| {
            // Re-simulation must reproduce the same particles
            if particles.use_auto_random_seed {
                particles.use_auto_random_seed = false;
                particles.random_seed = rand::random();
            }
            particles.is_playing = false;
            particles.time
        })?;
        Ok(())
    }

    fn start(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        self.origin = tick.time;
        Ok(())
    }

    fn update(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        let target = (self.base_time + (tick.time - self.origin) as f32).max(0.0);
        self.component.write(|particles| {
            if particles.time != target {
                particles.simulate_to = Some(target);
            }
        })
    }

    fn detach(&mut self) -> Result<(), AdapterError> {
        self.component.write(|particles| particles.is_playing = true)
    }
}

/// Scales playback speed; cannot follow rewinds.
#[derive(Debug)]
pub struct ScaledParticles {
    component: ComponentRef<ParticleSystem>,
    base_speed: f32,
}

impl ScaledParticles {
    pub fn new(component: ComponentRef<ParticleSystem>) -> Self {
        Self {
            component,
            base_speed: 1.0,
        }
    }
}

impl Tickable for ScaledParticles {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::ParticleSystem
    }

    fn component_id(&self) -> ComponentId {
        self.component.id()
    }

    fn is_alive(&self) -> bool {
        self.component.is_alive()
    }

    fn adjust_properties(&mut self) -> Result<(), AdapterError> {
        self.base_speed = self.component.read(|particles| particles.playback_speed)?;
        Ok(())
    }

    fn update(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        let speed = self.base_speed * tick.time_scale.max(0.0);
        self.component
            .write(|particles| particles.playback_speed = speed)
    }

    fn detach(&mut self) -> Result<(), AdapterError> {
        let speed = self.base_speed;
        self.component
            .write(|particles| particles.playback_speed = speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::tick;
    use crate::engine::{EngineObject, SceneObject};
    use approx::assert_relative_eq;

    #[test]
    fn test_variant_selection() {
        let mut object = SceneObject::new("torch");
        object.insert_particle_system(ParticleSystem::default());
        let handle = object.particle_system().unwrap();
        assert!(ParticleAdapter::new(handle.clone(), true).is_rewindable());
        assert!(!ParticleAdapter::new(handle, false).is_rewindable());
    }

    #[test]
    fn test_rewindable_follows_timeline() {
        let mut object = SceneObject::new("torch");
        let particles = object.insert_particle_system(ParticleSystem::default());
        let mut adapter = ParticleAdapter::new(object.particle_system().unwrap(), true);

        adapter.adjust_properties().unwrap();
        {
            let particles = particles.borrow();
            assert!(!particles.use_auto_random_seed);
            assert!(!particles.is_playing);
        }
        adapter.start(&tick(1.0, 1.0, true)).unwrap();

        adapter.update(&tick(3.0, 1.0, true)).unwrap();
        object.step(0.1);
        assert_relative_eq!(particles.borrow().time, 2.0);

        adapter.update(&tick(1.5, -1.0, false)).unwrap();
        object.step(0.1);
        assert_relative_eq!(particles.borrow().time, 0.5);
    }

    #[test]
    fn test_non_rewindable_scales_speed() {
        let mut object = SceneObject::new("smoke");
        let particles = object.insert_particle_system(ParticleSystem {
            playback_speed: 2.0,
            ..Default::default()
        });
        let mut adapter = ParticleAdapter::new(object.particle_system().unwrap(), false);
        adapter.adjust_properties().unwrap();

        adapter.update(&tick(0.0, 0.5, true)).unwrap();
        assert_eq!(particles.borrow().playback_speed, 1.0);
        adapter.update(&tick(0.0, -1.0, false)).unwrap();
        assert_eq!(particles.borrow().playback_speed, 0.0);
    }
}
