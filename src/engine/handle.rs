//! Non-owning handles to host engine components.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::CapabilityKind;

/// Identity of a component on its host object.
///
/// Stable for the component's lifetime and never reused by the same object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Failure to reach the engine component behind an adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("{kind} component {id} was destroyed")]
    StaleComponent { kind: CapabilityKind, id: ComponentId },
    #[error("{kind} component {id} is already borrowed")]
    ComponentBusy { kind: CapabilityKind, id: ComponentId },
}

/// Weak reference to a host component of capability `kind`.
///
/// Adapters observe and mutate the component through this handle but never
/// keep it alive. Once the host drops the component every access returns
/// [`AdapterError::StaleComponent`].
pub struct ComponentRef<T> {
    id: ComponentId,
    kind: CapabilityKind,
    handle: Weak<RefCell<T>>,
}

impl<T> ComponentRef<T> {
    pub fn new(id: ComponentId, kind: CapabilityKind, component: &Rc<RefCell<T>>) -> Self {
        Self {
            id,
            kind,
            handle: Rc::downgrade(component),
        }
    }

    #[inline]
    pub fn id(&self) -> ComponentId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    /// Check if the host still owns the component.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.handle.strong_count() > 0
    }

    /// Read the component's public state.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, AdapterError> {
        let component = self.upgrade()?;
        let guard = component.try_borrow().map_err(|_| self.busy())?;
        Ok(f(&guard))
    }

    /// Mutate the component's public state.
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, AdapterError> {
        let component = self.upgrade()?;
        let mut guard = component.try_borrow_mut().map_err(|_| self.busy())?;
        Ok(f(&mut guard))
    }

    fn upgrade(&self) -> Result<Rc<RefCell<T>>, AdapterError> {
        self.handle.upgrade().ok_or(AdapterError::StaleComponent {
            kind: self.kind,
            id: self.id,
        })
    }

    fn busy(&self) -> AdapterError {
        AdapterError::ComponentBusy {
            kind: self.kind,
            id: self.id,
        }
    }
}

impl<T> Clone for ComponentRef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            handle: Weak::clone(&self.handle),
        }
    }
}

impl<T> fmt::Debug for ComponentRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("alive", &self.is_alive())
            .finish()
    }
}
