//! Adapters - Per-capability wrappers between engine components and recorders.
//!
//! Every adapter implements [`Tickable`]; the ones keeping snapshot history
//! also implement [`Recordable`]. An adapter holds a weak handle to exactly one
//! engine component and fails with [`AdapterError::StaleComponent`] once the
//! host destroys it, until the next reconciliation drops the adapter.
//!
//! # Time scale behaviour
//!
//! | Adapter          | Forward                         | Paused / rewinding           |
//! |------------------|---------------------------------|------------------------------|
//! | Motion 3D / 2D   | records pose + unscaled velocity | kinematic, applies samples   |
//! | Transform        | records pose                    | applies samples              |
//! | Animator / clip  | speed × scale, records clip time | speed 0, applies samples     |
//! | Audio source     | pitch × scale                   | paused / negative pitch      |
//! | Particles        | re-simulated or speed × scale   | re-simulated or speed 0      |
//! | Nav mesh agent   | speeds × scale                  | stopped, velocity stashed    |
//! | Wind zone        | forces × scale                  | forces × scale               |

mod audio;
mod clip;
mod motion;
mod nav_mesh;
mod particles;
mod transform;
mod wind;

pub use audio::*;
pub use clip::*;
pub use motion::*;
pub use nav_mesh::*;
pub use particles::*;
pub use transform::*;
pub use wind::*;

pub use crate::engine::AdapterError;

use crate::engine::{CapabilityKind, ComponentId};
use crate::recording::{Interpolate, Recorder};
use crate::schema::RecordingConfig;
use crate::timeline::Tick;

/// Lifecycle shared by every capability adapter.
///
/// `adjust_properties` runs once after construction, `start` once after every
/// adapter of the object exists, then `update` every frame and `fixed_update`
/// every physics step. `detach` runs when reconciliation drops the adapter
/// while its component lives on.
pub trait Tickable {
    fn kind(&self) -> CapabilityKind;

    /// Id of the engine component this adapter wraps.
    fn component_id(&self) -> ComponentId;

    /// Check if the wrapped component still exists.
    fn is_alive(&self) -> bool;

    fn adjust_properties(&mut self) -> Result<(), AdapterError> {
        Ok(())
    }

    fn start(&mut self, _tick: &Tick) -> Result<(), AdapterError> {
        Ok(())
    }

    fn update(&mut self, tick: &Tick) -> Result<(), AdapterError>;

    fn fixed_update(&mut self, _tick: &Tick) -> Result<(), AdapterError> {
        Ok(())
    }

    /// Hand the component back to the engine before the adapter is dropped.
    ///
    /// Called only when `adjust_properties` has run and the component is
    /// still alive. Undoes whatever the adapter took over or scaled.
    fn detach(&mut self) -> Result<(), AdapterError> {
        Ok(())
    }
}

/// Adapters that keep a snapshot history.
pub trait Recordable {
    /// Number of retained snapshots.
    fn snapshot_count(&self) -> usize;

    /// Estimated bytes of a full history.
    fn estimate_memory_usage(&self) -> usize;

    /// Discard all history.
    fn reset(&mut self);

    /// Apply a new recording configuration; returns true if history was reset.
    fn reconfigure(&mut self, config: RecordingConfig) -> bool;
}

/// Record while playing forward, apply samples while replaying the past.
///
/// On the first forward tick after a rewind, history newer than the resume
/// point is discarded so the future is re-recorded.
pub(crate) fn record_or_replay<S: Interpolate>(
    recorder: &mut Recorder<S>,
    tick: &Tick,
    capture: impl FnOnce() -> Result<S, AdapterError>,
    apply: impl FnOnce(S) -> Result<(), AdapterError>,
) -> Result<(), AdapterError> {
    if tick.is_recording() {
        let dropped = recorder.truncate_after(tick.previous_time);
        if dropped > 0 {
            log::trace!("Discarded {} snapshots after {:.3}s", dropped, tick.previous_time);
        }
        if recorder.is_due(tick.time) {
            let state = capture()?;
            recorder.record(tick.time, state);
        }
    } else if tick.is_replaying() {
        if let Some(state) = recorder.sample(tick.time) {
            apply(state)?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::timeline::{PlaybackMode, Tick};

    /// Tick at `time` having moved `delta` real seconds at `time_scale`.
    pub fn tick(time: f64, time_scale: f32, at_live_edge: bool) -> Tick {
        let delta = 0.1;
        Tick {
            time,
            previous_time: time - f64::from(delta * time_scale),
            delta_time: delta * time_scale,
            unscaled_delta_time: delta,
            time_scale,
            mode: PlaybackMode::from_time_scale(time_scale),
            at_live_edge,
            rewindable: true,
        }
    }
}
