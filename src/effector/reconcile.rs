//! Reconciliation of the adapter set against live engine components.

use std::collections::HashSet;

use super::tracked::{Lifecycle, Stage, Tracked};
use super::{Effector, Positional};
use crate::adapters::{
    AnimationAdapter, AnimatorAdapter, AudioSourceAdapter, Motion2DAdapter, Motion3DAdapter,
    NavMeshAgentAdapter, ParticleAdapter, Tickable, TransformAdapter, WindZoneAdapter,
};
use crate::engine::{
    CapabilityKind, ComponentId, ComponentRef, EngineObject, RigidBody2D, RigidBody3D, Transform,
};

/// Adapters constructed and destroyed by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub constructed: Vec<CapabilityKind>,
    pub destroyed: Vec<CapabilityKind>,
}

impl ReconcileReport {
    /// Check if the pass changed nothing.
    pub fn is_unchanged(&self) -> bool {
        self.constructed.is_empty() && self.destroyed.is_empty()
    }
}

/// Live component chosen for the positional slot.
enum DesiredPositional {
    Motion3D(ComponentRef<RigidBody3D>),
    Motion2D(ComponentRef<RigidBody2D>),
    Transform(ComponentRef<Transform>),
}

impl DesiredPositional {
    fn detect(object: &impl EngineObject) -> Option<Self> {
        if let Some(body) = object.rigid_body_3d().filter(ComponentRef::is_alive) {
            return Some(DesiredPositional::Motion3D(body));
        }
        if let Some(body) = object.rigid_body_2d().filter(ComponentRef::is_alive) {
            return Some(DesiredPositional::Motion2D(body));
        }
        object
            .transform()
            .filter(ComponentRef::is_alive)
            .map(DesiredPositional::Transform)
    }

    fn kind(&self) -> CapabilityKind {
        match self {
            DesiredPositional::Motion3D(_) => CapabilityKind::Motion3D,
            DesiredPositional::Motion2D(_) => CapabilityKind::Motion2D,
            DesiredPositional::Transform(_) => CapabilityKind::Transform,
        }
    }

    fn id(&self) -> ComponentId {
        match self {
            DesiredPositional::Motion3D(handle) => handle.id(),
            DesiredPositional::Motion2D(handle) => handle.id(),
            DesiredPositional::Transform(handle) => handle.id(),
        }
    }
}

/// Give a dropped adapter's component back to the engine.
///
/// Adapters that never ran `adjust_properties` have nothing to undo, and
/// destroyed components have nobody to give back to.
fn release(slot: &mut dyn Lifecycle) {
    if slot.stage() == Stage::Constructed {
        return;
    }
    let adapter = slot.tickable();
    if !adapter.is_alive() {
        return;
    }
    if let Err(err) = adapter.detach() {
        log::debug!("Could not detach {} adapter: {}", adapter.kind(), err);
    }
}

/// Sync one single-instance slot with the live component, if any.
fn reconcile_single<A, T>(
    slot: &mut Option<Tracked<A>>,
    live: Option<ComponentRef<T>>,
    build: impl FnOnce(ComponentRef<T>) -> A,
    report: &mut ReconcileReport,
) where
    A: Tickable,
{
    let live = live.filter(ComponentRef::is_alive);
    let current = slot
        .as_ref()
        .map(|tracked| (tracked.adapter().component_id(), tracked.adapter().is_alive()));

    match (current, live) {
        (Some((id, true)), Some(live)) if id == live.id() => {}
        (Some(_), live) => {
            if let Some(mut old) = slot.take() {
                release(&mut old);
                report.destroyed.push(old.adapter().kind());
            }
            if let Some(live) = live {
                let adapter = build(live);
                report.constructed.push(adapter.kind());
                *slot = Some(Tracked::new(adapter));
            }
        }
        (None, Some(live)) => {
            let adapter = build(live);
            report.constructed.push(adapter.kind());
            *slot = Some(Tracked::new(adapter));
        }
        (None, None) => {}
    }
}

impl Effector {
    /// Re-derive the adapter set from the object's live components.
    ///
    /// Single-instance capabilities gain an adapter when their component
    /// appears and lose it (with its history) when it disappears. Audio
    /// sources are matched by component id; survivors keep their order and
    /// new sources are appended. The positional slot follows the priority
    /// motion 3D, motion 2D, transform. Calling this again without component
    /// changes does nothing.
    ///
    /// Must not be called from inside an adapter tick.
    pub fn reconcile(&mut self, object: &impl EngineObject) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let config = *self.timeline.recording_config();

        self.reconcile_positional(object, &mut report);

        reconcile_single(
            &mut self.animator,
            object.animator(),
            |handle| AnimatorAdapter::new(handle, config),
            &mut report,
        );
        reconcile_single(
            &mut self.animation,
            object.animation(),
            |handle| AnimationAdapter::new(handle, config),
            &mut report,
        );
        self.reconcile_audio_sources(object, &mut report);

        // Variant is fixed at construction
        let rewindable = config.rewindable;
        reconcile_single(
            &mut self.particle_system,
            object.particle_system(),
            |handle| ParticleAdapter::new(handle, rewindable),
            &mut report,
        );
        reconcile_single(
            &mut self.nav_mesh_agent,
            object.nav_mesh_agent(),
            NavMeshAgentAdapter::new,
            &mut report,
        );
        reconcile_single(
            &mut self.wind_zone,
            object.wind_zone(),
            WindZoneAdapter::new,
            &mut report,
        );

        if !report.is_unchanged() {
            log::debug!(
                "Reconciled adapters: +{:?} -{:?}",
                report.constructed,
                report.destroyed
            );
        }
        self.stats.adapters_constructed += report.constructed.len() as u64;
        self.stats.adapters_destroyed += report.destroyed.len() as u64;
        report
    }

    fn reconcile_positional(&mut self, object: &impl EngineObject, report: &mut ReconcileReport) {
        let desired = DesiredPositional::detect(object);
        let current = self.positional.tickable().map(|adapter| {
            (adapter.kind(), adapter.component_id(), adapter.is_alive())
        });

        if let (Some((kind, id, true)), Some(desired)) = (current, desired.as_ref()) {
            if kind == desired.kind() && id == desired.id() {
                return;
            }
        }
        if current.is_none() && desired.is_none() {
            return;
        }

        let config = *self.timeline.recording_config();
        let next = match desired {
            Some(DesiredPositional::Motion3D(handle)) => {
                Positional::Motion3D(Tracked::new(Motion3DAdapter::new(handle, config)))
            }
            Some(DesiredPositional::Motion2D(handle)) => {
                Positional::Motion2D(Tracked::new(Motion2DAdapter::new(handle, config)))
            }
            Some(DesiredPositional::Transform(handle)) => {
                Positional::Transform(Tracked::new(TransformAdapter::new(handle, config)))
            }
            None => Positional::None,
        };

        if let Some(kind) = next.kind() {
            report.constructed.push(kind);
        }
        // Dropping the previous adapter releases its history
        let mut previous = self.positional.replace(next);
        if let Some(slot) = previous.lifecycle_mut() {
            release(slot);
        }
        if let Some(kind) = previous.kind() {
            report.destroyed.push(kind);
        }
    }

    fn reconcile_audio_sources(&mut self, object: &impl EngineObject, report: &mut ReconcileReport) {
        let live: Vec<_> = object
            .audio_sources()
            .into_iter()
            .filter(ComponentRef::is_alive)
            .collect();
        let live_ids: HashSet<ComponentId> = live.iter().map(ComponentRef::id).collect();

        self.audio_sources.retain_mut(|tracked| {
            let adapter = tracked.adapter();
            let keep = adapter.is_alive() && live_ids.contains(&adapter.component_id());
            if !keep {
                release(tracked);
                report.destroyed.push(CapabilityKind::AudioSource);
            }
            keep
        });

        let tracked_ids: HashSet<ComponentId> = self
            .audio_sources
            .iter()
            .map(|tracked| tracked.adapter().component_id())
            .collect();
        for handle in live {
            if !tracked_ids.contains(&handle.id()) {
                self.audio_sources
                    .push(Tracked::new(AudioSourceAdapter::new(handle)));
                report.constructed.push(CapabilityKind::AudioSource);
            }
        }
    }
}
