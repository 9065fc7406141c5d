//! Engine module - Boundary with the host engine's component system.
//!
//! The host owns its components; the crate only sees them through
//! [`EngineObject`] capability queries that hand out weak [`ComponentRef`] handles.

mod capability;
mod components;
mod handle;
mod object;

pub use capability::*;
pub use components::*;
pub use handle::*;
pub use object::*;
