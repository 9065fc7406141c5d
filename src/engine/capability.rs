//! Capability kinds a tracked object can expose.

use std::fmt;

/// Every capability the effector knows how to track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapabilityKind {
    Motion3D,
    Motion2D,
    Transform,
    Animator,
    Animation,
    AudioSource,
    ParticleSystem,
    NavMeshAgent,
    WindZone,
}

impl CapabilityKind {
    /// Capabilities that describe spatial placement; at most one is tracked.
    pub const POSITIONAL: [CapabilityKind; 3] = [
        CapabilityKind::Motion3D,
        CapabilityKind::Motion2D,
        CapabilityKind::Transform,
    ];

    /// Check if this kind is one of the mutually exclusive positional kinds.
    #[inline]
    pub fn is_positional(self) -> bool {
        Self::POSITIONAL.contains(&self)
    }

    pub fn name(self) -> &'static str {
        match self {
            CapabilityKind::Motion3D => "motion-3d",
            CapabilityKind::Motion2D => "motion-2d",
            CapabilityKind::Transform => "transform",
            CapabilityKind::Animator => "animator",
            CapabilityKind::Animation => "animation",
            CapabilityKind::AudioSource => "audio-source",
            CapabilityKind::ParticleSystem => "particle-system",
            CapabilityKind::NavMeshAgent => "nav-mesh-agent",
            CapabilityKind::WindZone => "wind-zone",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
