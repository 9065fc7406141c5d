//! Design-time memory estimates.
//!
//! These use the same formula as [`Recorder::estimate_memory_usage`], so the
//! figure shown before simulation matches the one reported by live adapters.
//!
//! [`Recorder::estimate_memory_usage`]: crate::recording::Recorder::estimate_memory_usage

use crate::adapters::{ClipState, Motion2DState, Motion3DState, TransformState};
use crate::engine::{CapabilityKind, EngineObject};
use crate::recording;
use crate::schema::RecordingConfig;

/// Positional capability reconciliation would select for `object`.
///
/// Priority is motion 3D, then motion 2D, then transform.
pub fn positional_kind(object: &impl EngineObject) -> Option<CapabilityKind> {
    if object.rigid_body_3d().is_some_and(|c| c.is_alive()) {
        Some(CapabilityKind::Motion3D)
    } else if object.rigid_body_2d().is_some_and(|c| c.is_alive()) {
        Some(CapabilityKind::Motion2D)
    } else if object.transform().is_some_and(|c| c.is_alive()) {
        Some(CapabilityKind::Transform)
    } else {
        None
    }
}

/// Bytes a full history of `kind` snapshots needs under `config`.
///
/// Capabilities without history report zero.
pub fn estimate_memory_usage(config: &RecordingConfig, kind: CapabilityKind) -> usize {
    match kind {
        CapabilityKind::Motion3D => recording::estimate_memory_usage::<Motion3DState>(config),
        CapabilityKind::Motion2D => recording::estimate_memory_usage::<Motion2DState>(config),
        CapabilityKind::Transform => recording::estimate_memory_usage::<TransformState>(config),
        CapabilityKind::Animator | CapabilityKind::Animation => {
            recording::estimate_memory_usage::<ClipState>(config)
        }
        CapabilityKind::AudioSource
        | CapabilityKind::ParticleSystem
        | CapabilityKind::NavMeshAgent
        | CapabilityKind::WindZone => 0,
    }
}

/// Positional memory estimate for an object that is not simulated yet.
pub fn estimate_object_memory_usage(object: &impl EngineObject, config: &RecordingConfig) -> usize {
    positional_kind(object).map_or(0, |kind| estimate_memory_usage(config, kind))
}
