//! Snapshot recording and interpolated sampling.
//!
//! A [`Recorder`] keeps a bounded, timestamp-ordered history of
//! [`Snapshot`]s for one capability instance:
//!
//! ```text
//! interval = 0.5s, duration = 2.0s
//!
//!   t:      0.5   1.0   1.5   2.0   2.5      <- newest
//!           |-----|-----|-----|-----|
//!           ^ oldest retained (age == duration is kept)
//! ```
//!
//! Captures are gated by the recording interval, old entries are evicted on
//! write, and [`Recorder::sample`] blends the two snapshots bracketing any
//! requested timestamp through the [`Interpolate`] trait.

mod interpolate;
mod recorder;
mod snapshot;

pub use interpolate::{Interpolate, lerp_angle_degrees, slerp_shortest};
pub use recorder::{Recorder, TIME_EPSILON, estimate_memory_usage};
pub use snapshot::Snapshot;
