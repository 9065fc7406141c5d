//! Public state of the host engine components the adapters wrap.
//!
//! These mirror the fields a host exposes for each capability. Adapters only
//! read and write these fields; the host owns the components and advances
//! them with its own physics, animation, audio and particle systems.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial placement without physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// 3D rigid body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBody3D {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    /// Angular velocity in radians per second.
    pub angular_velocity: Vec3,
    pub is_kinematic: bool,
    pub use_gravity: bool,
}

impl Default for RigidBody3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            is_kinematic: false,
            use_gravity: true,
        }
    }
}

/// 2D rigid body. Rotation is in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBody2D {
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    /// Angular velocity in degrees per second.
    pub angular_velocity: f32,
    pub is_kinematic: bool,
    pub gravity_scale: f32,
}

impl Default for RigidBody2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            is_kinematic: false,
            gravity_scale: 1.0,
        }
    }
}

/// State-machine animator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animator {
    pub speed: f32,
    /// Name of the active state.
    pub state: String,
    /// Progress through the active state, 1.0 per loop.
    pub normalized_time: f32,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            speed: 1.0,
            state: String::from("Idle"),
            normalized_time: 0.0,
        }
    }
}

/// Legacy clip-based animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    pub clip: String,
    /// Seconds into the clip.
    pub time: f32,
    pub speed: f32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            clip: String::from("Default"),
            time: 0.0,
            speed: 1.0,
        }
    }
}

/// Audio emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSource {
    pub clip: String,
    /// Playback rate; negative plays backwards.
    pub pitch: f32,
    pub is_playing: bool,
    /// Seconds into the clip.
    pub time: f32,
}

impl Default for AudioSource {
    fn default() -> Self {
        Self {
            clip: String::new(),
            pitch: 1.0,
            is_playing: true,
            time: 0.0,
        }
    }
}

/// Particle emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSystem {
    /// Seconds of simulated emission.
    pub time: f32,
    pub playback_speed: f32,
    pub is_playing: bool,
    pub random_seed: u32,
    pub use_auto_random_seed: bool,
    /// Request for the host to re-simulate from the seed up to this time.
    pub simulate_to: Option<f32>,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self {
            time: 0.0,
            playback_speed: 1.0,
            is_playing: true,
            random_seed: 0,
            use_auto_random_seed: true,
            simulate_to: None,
        }
    }
}

/// Path-following agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavMeshAgent {
    pub speed: f32,
    pub angular_speed: f32,
    pub acceleration: f32,
    pub velocity: Vec3,
    pub destination: Vec3,
}

impl Default for NavMeshAgent {
    fn default() -> Self {
        Self {
            speed: 3.5,
            angular_speed: 120.0,
            acceleration: 8.0,
            velocity: Vec3::ZERO,
            destination: Vec3::ZERO,
        }
    }
}

/// Wind source affecting particles and foliage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindZone {
    pub main: f32,
    pub turbulence: f32,
    pub pulse_magnitude: f32,
    pub pulse_frequency: f32,
}

impl Default for WindZone {
    fn default() -> Self {
        Self {
            main: 1.0,
            turbulence: 1.0,
            pulse_magnitude: 0.5,
            pulse_frequency: 0.01,
        }
    }
}
