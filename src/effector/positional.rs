//! The single positional adapter of a tracked object.

use std::mem;

use super::tracked::{Lifecycle, Tracked};
use crate::adapters::{Motion2DAdapter, Motion3DAdapter, Recordable, Tickable, TransformAdapter};
use crate::engine::{CapabilityKind, ComponentId};

/// Motion 3D, motion 2D and transform all describe spatial placement; an
/// object tracks at most one of them. Holding them in one field makes the
/// exclusivity structural.
#[derive(Debug, Default)]
pub enum Positional {
    #[default]
    None,
    Motion3D(Tracked<Motion3DAdapter>),
    Motion2D(Tracked<Motion2DAdapter>),
    Transform(Tracked<TransformAdapter>),
}

impl Positional {
    pub fn is_none(&self) -> bool {
        matches!(self, Positional::None)
    }

    pub fn kind(&self) -> Option<CapabilityKind> {
        self.tickable().map(Tickable::kind)
    }

    pub fn component_id(&self) -> Option<ComponentId> {
        self.tickable().map(Tickable::component_id)
    }

    /// Swap in a new adapter, returning the previous one.
    pub(crate) fn replace(&mut self, next: Positional) -> Positional {
        mem::replace(self, next)
    }

    pub fn tickable(&self) -> Option<&dyn Tickable> {
        match self {
            Positional::None => None,
            Positional::Motion3D(tracked) => Some(tracked.adapter()),
            Positional::Motion2D(tracked) => Some(tracked.adapter()),
            Positional::Transform(tracked) => Some(tracked.adapter()),
        }
    }

    pub fn recordable(&self) -> Option<&dyn Recordable> {
        match self {
            Positional::None => None,
            Positional::Motion3D(tracked) => Some(tracked.adapter()),
            Positional::Motion2D(tracked) => Some(tracked.adapter()),
            Positional::Transform(tracked) => Some(tracked.adapter()),
        }
    }

    pub(crate) fn recordable_mut(&mut self) -> Option<&mut dyn Recordable> {
        match self {
            Positional::None => None,
            Positional::Motion3D(tracked) => Some(tracked.adapter_mut()),
            Positional::Motion2D(tracked) => Some(tracked.adapter_mut()),
            Positional::Transform(tracked) => Some(tracked.adapter_mut()),
        }
    }

    pub(crate) fn lifecycle_mut(&mut self) -> Option<&mut dyn Lifecycle> {
        match self {
            Positional::None => None,
            Positional::Motion3D(tracked) => Some(tracked),
            Positional::Motion2D(tracked) => Some(tracked),
            Positional::Transform(tracked) => Some(tracked),
        }
    }
}
