//! Global clocks shared by many timelines.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a global clock.
pub type SharedClock = Rc<RefCell<GlobalClock>>;

/// A named time-scale multiplier applied to every timeline following it.
#[derive(Debug, Clone)]
pub struct GlobalClock {
    name: String,
    time_scale: f32,
    paused: bool,
}

impl GlobalClock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_scale: 1.0,
            paused: false,
        }
    }

    /// Wrap into a shared handle.
    pub fn shared(self) -> SharedClock {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scale applied to followers; zero while paused.
    pub fn time_scale(&self) -> f32 {
        if self.paused { 0.0 } else { self.time_scale }
    }

    /// Set the clock's scale. Non-finite values are ignored.
    pub fn set_time_scale(&mut self, time_scale: f32) {
        if time_scale.is_finite() {
            self.time_scale = time_scale;
        } else {
            log::warn!("Ignoring non-finite time scale {} for clock '{}'", time_scale, self.name);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause every follower without losing the configured scale.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }
}

/// Clocks looked up by name.
#[derive(Debug, Default)]
pub struct ClockRegistry {
    clocks: HashMap<String, SharedClock>,
}

impl ClockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clock by name, creating it at normal speed if missing.
    pub fn get_or_create(&mut self, name: &str) -> SharedClock {
        Rc::clone(
            self.clocks
                .entry(name.to_string())
                .or_insert_with(|| GlobalClock::new(name).shared()),
        )
    }

    pub fn get(&self, name: &str) -> Option<SharedClock> {
        self.clocks.get(name).map(Rc::clone)
    }

    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }
}
