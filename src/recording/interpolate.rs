//! Interpolation between two recorded states.

use glam::{Quat, Vec2, Vec3};

/// A state that can be blended with a later state of the same kind.
///
/// `t` is the normalized position between `self` (0.0) and `other` (1.0).
/// Discrete fields (clip names, flags) keep the value of `self`, which gives
/// nearest-at-or-before semantics when sampling a recorder.
pub trait Interpolate: Clone {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec2 {
    #[inline]
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

impl Interpolate for Vec3 {
    #[inline]
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

impl Interpolate for Quat {
    #[inline]
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        slerp_shortest(*self, *other, t)
    }
}

/// Spherical interpolation along the shortest arc.
///
/// `q` and `-q` describe the same rotation; the end point is flipped into the
/// same hemisphere as the start so the blend never takes the long way round.
pub fn slerp_shortest(from: Quat, to: Quat, t: f32) -> Quat {
    let to = if from.dot(to) < 0.0 { -to } else { to };
    from.slerp(to, t).normalize()
}

/// Interpolate two angles in degrees along the shortest direction.
pub fn lerp_angle_degrees(from: f32, to: f32, t: f32) -> f32 {
    let mut delta = (to - from) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    from + delta * t
}
