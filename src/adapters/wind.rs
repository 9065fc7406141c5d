//! Wind zone adapter.

use super::{AdapterError, Tickable};
use crate::engine::{CapabilityKind, ComponentId, ComponentRef, WindZone};
use crate::timeline::Tick;

/// Scales wind forces with time. Negative scales reverse the wind; pulse
/// frequency follows the magnitude of the scale.
#[derive(Debug)]
pub struct WindZoneAdapter {
    component: ComponentRef<WindZone>,
    base: WindZone,
}

impl WindZoneAdapter {
    pub fn new(component: ComponentRef<WindZone>) -> Self {
        Self {
            component,
            base: WindZone::default(),
        }
    }
}

impl Tickable for WindZoneAdapter {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::WindZone
    }

    fn component_id(&self) -> ComponentId {
        self.component.id()
    }

    fn is_alive(&self) -> bool {
        self.component.is_alive()
    }

    fn adjust_properties(&mut self) -> Result<(), AdapterError> {
        self.base = self.component.read(WindZone::clone)?;
        Ok(())
    }

    fn update(&mut self, tick: &Tick) -> Result<(), AdapterError> {
        let scale = tick.time_scale;
        let base = &self.base;
        self.component.write(|wind| {
            wind.main = base.main * scale;
            wind.turbulence = base.turbulence * scale;
            wind.pulse_magnitude = base.pulse_magnitude * scale;
            wind.pulse_frequency = base.pulse_frequency * scale.abs();
        })
    }

    fn detach(&mut self) -> Result<(), AdapterError> {
        let base = self.base.clone();
        self.component.write(|wind| *wind = base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::tick;
    use crate::engine::{EngineObject, SceneObject};
    use approx::assert_relative_eq;

    #[test]
    fn test_reverses_with_rewind() {
        let mut object = SceneObject::new("storm");
        let wind = object.insert_wind_zone(WindZone {
            main: 2.0,
            pulse_frequency: 0.5,
            ..Default::default()
        });
        let mut adapter = WindZoneAdapter::new(object.wind_zone().unwrap());
        adapter.adjust_properties().unwrap();

        adapter.update(&tick(0.0, -0.5, false)).unwrap();
        let wind = wind.borrow();
        assert_relative_eq!(wind.main, -1.0);
        assert_relative_eq!(wind.pulse_frequency, 0.25);
    }
}
