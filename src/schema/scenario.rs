//! Scenario files driving the command-line runner.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ConfigError, TimelineConfig};
use crate::engine::{
    Animation, Animator, AudioSource, NavMeshAgent, ParticleSystem, RigidBody2D, RigidBody3D,
    SceneObject, Transform, WindZone,
};

fn default_frame_delta() -> f32 {
    1.0 / 60.0
}

fn default_fixed_delta() -> f32 {
    0.02
}

/// Components attached to the scenario's object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentSet {
    pub transform: Option<Transform>,
    pub rigid_body_3d: Option<RigidBody3D>,
    pub rigid_body_2d: Option<RigidBody2D>,
    pub animator: Option<Animator>,
    pub animation: Option<Animation>,
    pub audio_sources: Vec<AudioSource>,
    pub particle_system: Option<ParticleSystem>,
    pub nav_mesh_agent: Option<NavMeshAgent>,
    pub wind_zone: Option<WindZone>,
}

impl ComponentSet {
    /// Build a host object owning a copy of every listed component.
    pub fn build(&self, name: &str) -> SceneObject {
        let mut object = SceneObject::new(name);
        if let Some(transform) = &self.transform {
            object.insert_transform(transform.clone());
        }
        if let Some(body) = &self.rigid_body_3d {
            object.insert_rigid_body_3d(body.clone());
        }
        if let Some(body) = &self.rigid_body_2d {
            object.insert_rigid_body_2d(body.clone());
        }
        if let Some(animator) = &self.animator {
            object.insert_animator(animator.clone());
        }
        if let Some(animation) = &self.animation {
            object.insert_animation(animation.clone());
        }
        for source in &self.audio_sources {
            object.add_audio_source(source.clone());
        }
        if let Some(particles) = &self.particle_system {
            object.insert_particle_system(particles.clone());
        }
        if let Some(agent) = &self.nav_mesh_agent {
            object.insert_nav_mesh_agent(agent.clone());
        }
        if let Some(wind) = &self.wind_zone {
            object.insert_wind_zone(wind.clone());
        }
        object
    }
}

/// One step of a scenario script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Phase {
    /// Run frames for `duration` real seconds at `time_scale`.
    Play { time_scale: f32, duration: f32 },
    /// Jump to a past timeline position and hold.
    RewindTo { time: f64 },
    /// Change the capture interval (discards history).
    SetRecordingInterval { interval: f64 },
    /// Change the retained history length, trimming history if shorter.
    SetRecordingDuration { duration: f64 },
    /// Discard all history.
    ResetRecordings,
    /// Set the scale of the timeline's global clock.
    SetGlobalTimeScale { time_scale: f32 },
}

/// A complete runner script: one object, its timeline and a list of phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Object name used in output.
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub timeline: TimelineConfig,
    /// Real seconds per rendered frame.
    #[serde(default = "default_frame_delta")]
    pub frame_delta: f32,
    /// Real seconds per physics step.
    #[serde(default = "default_fixed_delta")]
    pub fixed_delta: f32,
    #[serde(default)]
    pub components: ComponentSet,
    pub phases: Vec<Phase>,
}

fn default_name() -> String {
    "object".to_string()
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "falling-crate".to_string(),
            timeline: TimelineConfig::default(),
            frame_delta: default_frame_delta(),
            fixed_delta: default_fixed_delta(),
            components: ComponentSet {
                rigid_body_3d: Some(RigidBody3D::default()),
                audio_sources: vec![AudioSource {
                    is_playing: true,
                    ..Default::default()
                }],
                wind_zone: Some(WindZone::default()),
                ..Default::default()
            },
            phases: vec![
                Phase::Play {
                    time_scale: 1.0,
                    duration: 4.0,
                },
                Phase::Play {
                    time_scale: -1.0,
                    duration: 2.0,
                },
                Phase::Play {
                    time_scale: 0.5,
                    duration: 2.0,
                },
                Phase::RewindTo { time: 1.0 },
            ],
        }
    }
}

impl Scenario {
    /// Read and validate a scenario from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.timeline.validate()?;
        if !(self.frame_delta.is_finite() && self.frame_delta > 0.0) {
            return Err(ScenarioError::InvalidStep(self.frame_delta));
        }
        if !(self.fixed_delta.is_finite() && self.fixed_delta > 0.0) {
            return Err(ScenarioError::InvalidStep(self.fixed_delta));
        }
        for (index, phase) in self.phases.iter().enumerate() {
            match phase {
                Phase::Play {
                    time_scale,
                    duration,
                } => {
                    if !time_scale.is_finite() {
                        return Err(ConfigError::InvalidTimeScale(*time_scale).into());
                    }
                    if !(duration.is_finite() && *duration >= 0.0) {
                        return Err(ScenarioError::InvalidPhase {
                            index,
                            reason: format!("duration must be non-negative (got {})", duration),
                        });
                    }
                }
                Phase::SetGlobalTimeScale { time_scale } if !time_scale.is_finite() => {
                    return Err(ConfigError::InvalidTimeScale(*time_scale).into());
                }
                Phase::RewindTo { time } if !time.is_finite() => {
                    return Err(ScenarioError::InvalidPhase {
                        index,
                        reason: format!("rewind target must be finite (got {})", time),
                    });
                }
                Phase::SetRecordingInterval { interval } if !(interval.is_finite() && *interval > 0.0) => {
                    return Err(ConfigError::InvalidRecordingInterval(*interval).into());
                }
                Phase::SetRecordingDuration { duration } if !(duration.is_finite() && *duration > 0.0) => {
                    return Err(ConfigError::InvalidRecordingDuration(*duration).into());
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Errors loading or validating a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse scenario: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Frame and physics steps must be positive (got {0})")]
    InvalidStep(f32),
    #[error("Phase {index} is invalid: {reason}")]
    InvalidPhase { index: usize, reason: String },
}
