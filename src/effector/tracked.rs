//! Lifecycle bookkeeping for adapters owned by an effector.

use crate::adapters::Tickable;

/// How far an adapter has progressed through its one-time lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Constructed; `adjust_properties` not yet run.
    Constructed,
    /// `adjust_properties` done; waiting for `start`.
    Adjusted,
    /// Receiving per-frame updates.
    Started,
}

/// An adapter together with its lifecycle stage.
#[derive(Debug)]
pub struct Tracked<A> {
    adapter: A,
    stage: Stage,
}

impl<A> Tracked<A> {
    pub(crate) fn new(adapter: A) -> Self {
        Self {
            adapter,
            stage: Stage::Constructed,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub(crate) fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

/// Object-safe view over any tracked adapter.
pub(crate) trait Lifecycle {
    fn stage(&self) -> Stage;

    fn set_stage(&mut self, stage: Stage);

    fn tickable(&mut self) -> &mut dyn Tickable;
}

impl<A: Tickable> Lifecycle for Tracked<A> {
    fn stage(&self) -> Stage {
        self.stage
    }

    fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    fn tickable(&mut self) -> &mut dyn Tickable {
        &mut self.adapter
    }
}
