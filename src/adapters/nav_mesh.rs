//! Nav mesh agent adapter.

use glam::Vec3;

use super::{AdapterError, Tickable};
use crate::engine::{CapabilityKind, ComponentId, ComponentRef, NavMeshAgent};
use crate::timeline::Tick;

/// Scales an agent's movement parameters; stops it while time is not moving forward.
#[derive(Debug)]
pub struct NavMeshAgentAdapter {
    component: ComponentRef<NavMeshAgent>,
    base_speed: f32,
    base_angular_speed: f32,
    base_acceleration: f32,
    last_time_scale: f32,
    /// Unscaled velocity held while stopped.
    stashed_velocity: Option<Vec3>,
}

impl NavMeshAgentAdapter {
    pub fn new(component: ComponentRef<NavMeshAgent>) -> Self {
        Self {
            component,
            base_speed: 0.0,
            base_angular_speed: 0.0,
            base_acceleration: 0.0,
            last_time_scale: 1.0,
            stashed_velocity: None,
        }
    }
}

impl Tickable for NavMeshAgentAdapter {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::NavMeshAgent
    }

    fn component_id(&self) -> ComponentId {
        self.component.id()
    }

    fn is_alive(&self) -> bool {
        self.component.is_alive()
    }

    fn adjust_properties(&mut self) -> Result<(), AdapterError> {
        let (speed, angular_speed, acceleration) = self
            .component
            .read(|agent| (agent.speed, agent.angular_speed, agent.acceleration))?;
        self.base_speed = speed;
        self.base_angular_speed = angular_speed;
        self.base_acceleration = acceleration;
        Ok(())
    }

    fn update(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        let previous = self.last_time_scale;
        let time_scale = tick.time_scale;
        let factor = time_scale.max(0.0);
        let (speed, angular_speed, acceleration) = (
            self.base_speed * factor,
            self.base_angular_speed * factor,
            self.base_acceleration * factor,
        );
        let stashed = self.stashed_velocity;

        self.stashed_velocity = self.component.write(|agent| {
            agent.speed = speed;
            agent.angular_speed = angular_speed;
            agent.acceleration = acceleration;

            if time_scale == previous {
                return stashed;
            }
            match (previous > 0.0, time_scale > 0.0) {
                (true, true) => {
                    agent.velocity *= time_scale / previous;
                    None
                }
                (true, false) => {
                    let unscaled = agent.velocity / previous;
                    agent.velocity = Vec3::ZERO;
                    Some(unscaled)
                }
                (false, true) => {
                    if let Some(velocity) = stashed {
                        agent.velocity = velocity * time_scale;
                    }
                    None
                }
                (false, false) => stashed,
            }
        })?;
        self.last_time_scale = time_scale;
        Ok(())
    }

    fn detach(&mut self) -> Result<(), AdapterError> {
        let (speed, angular_speed, acceleration) =
            (self.base_speed, self.base_angular_speed, self.base_acceleration);
        let last_time_scale = self.last_time_scale;
        let stashed = self.stashed_velocity.take();
        self.component.write(|agent| {
            agent.speed = speed;
            agent.angular_speed = angular_speed;
            agent.acceleration = acceleration;
            if let Some(velocity) = stashed {
                agent.velocity = velocity;
            } else if last_time_scale > 0.0 {
                agent.velocity /= last_time_scale;
            }
        })?;
        self.last_time_scale = 1.0;
        Ok(())
    }
}
