//! Temporal Rewind - Snapshot recording and rewind engine for real-time
//! simulated objects.
//!
//! Each tracked object gets an [`Effector`] that owns a [`Timeline`] and one
//! adapter per capability the object has (rigid bodies, transform, animation,
//! audio, particles, navigation, wind). Playing forward records periodic
//! snapshots into bounded ring buffers; a negative time scale or an explicit
//! rewind samples and interpolates those snapshots back onto the object.
//!
//! # Architecture
//!
//! - `recording`: snapshots, bounded recorders and interpolation
//! - `timeline`: per-object clock, playback modes and shared global clocks
//! - `engine`: host boundary (capability queries, weak component handles) and
//!   an in-memory host object
//! - `adapters`: per-capability capture/apply and time-scale behaviour
//! - `effector`: adapter discovery, lifecycle dispatch and memory estimates
//! - `schema`: configuration and scenario files
//! - `runner`: scripted scenario driver used by the CLI
//!
//! # Example
//!
//! ```rust,no_run
//! use temporal_rewind::{
//!     effector::Effector,
//!     engine::{RigidBody3D, SceneObject},
//!     schema::TimelineConfig,
//! };
//!
//! let mut object = SceneObject::new("crate");
//! object.insert_rigid_body_3d(RigidBody3D::default());
//!
//! let mut effector = Effector::attach(&object, &TimelineConfig::default()).unwrap();
//!
//! // Play forward for two seconds at 60 fps
//! for _ in 0..120 {
//!     object.step(1.0 / 60.0);
//!     effector.fixed_update(1.0 / 60.0);
//!     effector.update(1.0 / 60.0);
//! }
//!
//! // Jump back one second and hold there
//! effector.rewind_to(1.0);
//! println!("History uses ~{} bytes", effector.estimate_memory_usage());
//! ```

pub mod adapters;
pub mod effector;
pub mod engine;
pub mod recording;
pub mod runner;
pub mod schema;
pub mod timeline;

// Re-export commonly used types
pub use effector::{Effector, ReconcileReport};
pub use engine::{EngineObject, SceneObject};
pub use recording::{Recorder, Snapshot};
pub use runner::{RunStats, ScenarioRunner};
pub use schema::{RecordingConfig, Scenario, TimelineConfig};
pub use timeline::{GlobalClock, PlaybackMode, Timeline};
