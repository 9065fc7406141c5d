//! Effector - Discovers an object's capabilities and drives their adapters.
//!
//! One [`Effector`] per tracked object owns its [`Timeline`](crate::timeline::Timeline)
//! and the adapters built for its live components. [`Effector::reconcile`]
//! brings the adapter set in line with the object; [`Effector::update`] and
//! [`Effector::fixed_update`] tick it.

mod memory;
mod positional;
mod reconcile;
mod registry;
mod tracked;

pub use memory::{estimate_memory_usage, estimate_object_memory_usage, positional_kind};
pub use positional::Positional;
pub use reconcile::ReconcileReport;
pub use registry::{Effector, EffectorStats};
pub use tracked::{Stage, Tracked};
