//! Scenario runner - Drives one scene object through a scripted sequence of
//! time-scale phases.

use glam::Vec3;

use crate::effector::Effector;
use crate::engine::{EngineObject, SceneObject};
use crate::schema::{ConfigError, Phase, Scenario, ScenarioError};
use crate::timeline::{ClockRegistry, PlaybackMode, SharedClock, Tick};

/// Observable state after a phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub time: f64,
    pub live_time: f64,
    pub mode: PlaybackMode,
    pub frames: u64,
    pub snapshots: usize,
    pub memory_bytes: usize,
    pub adapters: usize,
    pub failed_calls: u64,
    /// Position of the positional component, if any.
    pub position: Option<Vec3>,
}

impl RunStats {
    /// Collect statistics from a running scenario.
    pub fn from_runner(runner: &ScenarioRunner) -> Self {
        let effector = runner.effector();
        let timeline = effector.timeline();
        Self {
            time: timeline.time(),
            live_time: timeline.live_time(),
            mode: timeline.mode(),
            frames: runner.frames,
            snapshots: effector.positional_snapshot_count(),
            memory_bytes: effector.estimate_memory_usage(),
            adapters: effector.adapter_count(),
            failed_calls: effector.stats().failed_calls,
            position: object_position(runner.object()),
        }
    }
}

fn object_position(object: &SceneObject) -> Option<Vec3> {
    if let Some(body) = object.rigid_body_3d() {
        return body.read(|body| body.position).ok();
    }
    if let Some(body) = object.rigid_body_2d() {
        return body.read(|body| body.position.extend(0.0)).ok();
    }
    object
        .transform()
        .and_then(|transform| transform.read(|transform| transform.position).ok())
}

/// Frame loop over a scenario's object and effector.
///
/// Each frame advances the host simulation, runs the physics steps that fit
/// in the elapsed real time, then updates the effector so snapshots capture
/// the state reached at the new timeline position.
#[derive(Debug)]
pub struct ScenarioRunner {
    scenario: Scenario,
    object: SceneObject,
    effector: Effector,
    clocks: ClockRegistry,
    global_clock: Option<SharedClock>,
    accumulator: f32,
    frames: u64,
}

impl ScenarioRunner {
    pub fn new(scenario: Scenario) -> Result<Self, ScenarioError> {
        scenario.validate()?;
        let object = scenario.components.build(&scenario.name);
        let mut effector = Effector::attach(&object, &scenario.timeline)?;

        let mut clocks = ClockRegistry::new();
        let global_clock = scenario
            .timeline
            .global_clock
            .as_deref()
            .map(|name| clocks.get_or_create(name));
        effector.timeline_mut().set_global_clock(global_clock.clone());

        log::info!(
            "Tracking '{}' with {:?}",
            scenario.name,
            effector.active_kinds()
        );
        Ok(Self {
            scenario,
            object,
            effector,
            clocks,
            global_clock,
            accumulator: 0.0,
            frames: 0,
        })
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn object(&self) -> &SceneObject {
        &self.object
    }

    /// Mutable host object; call [`reconcile`](Self::reconcile) after edits.
    pub fn object_mut(&mut self) -> &mut SceneObject {
        &mut self.object
    }

    pub fn effector(&self) -> &Effector {
        &self.effector
    }

    pub fn effector_mut(&mut self) -> &mut Effector {
        &mut self.effector
    }

    /// Clocks created for this run, by name.
    pub fn clocks(&self) -> &ClockRegistry {
        &self.clocks
    }

    /// Sync adapters with the host object's components.
    pub fn reconcile(&mut self) {
        self.effector.reconcile(&self.object);
    }

    /// Run one rendered frame.
    pub fn frame(&mut self) -> Tick {
        let frame_delta = self.scenario.frame_delta;
        let fixed_delta = self.scenario.fixed_delta;

        self.object.step(frame_delta);
        self.accumulator += frame_delta;
        while self.accumulator >= fixed_delta {
            self.effector.fixed_update(fixed_delta);
            self.accumulator -= fixed_delta;
        }
        let tick = self.effector.update(frame_delta);
        self.frames += 1;
        tick
    }

    /// Apply one phase and report the resulting state.
    pub fn run_phase(&mut self, phase: &Phase) -> Result<RunStats, ConfigError> {
        match *phase {
            Phase::Play {
                time_scale,
                duration,
            } => {
                self.effector.set_time_scale(time_scale)?;
                let frames = (duration / self.scenario.frame_delta).round() as u64;
                for _ in 0..frames {
                    self.frame();
                }
            }
            Phase::RewindTo { time } => {
                let reached = self.effector.rewind_to(time);
                if (reached - time).abs() > f64::from(f32::EPSILON) {
                    log::info!("Rewind to {:.3}s clamped to {:.3}s", time, reached);
                }
            }
            Phase::SetRecordingInterval { interval } => {
                self.effector.set_recording_interval(interval)?;
            }
            Phase::SetRecordingDuration { duration } => {
                self.effector.set_recording_duration(duration)?;
            }
            Phase::ResetRecordings => self.effector.reset_recordings(),
            Phase::SetGlobalTimeScale { time_scale } => match &self.global_clock {
                Some(clock) => clock.borrow_mut().set_time_scale(time_scale),
                None => log::warn!("No global clock configured; ignoring global time scale"),
            },
        }
        Ok(RunStats::from_runner(self))
    }

    /// Run every phase in order.
    pub fn run(&mut self) -> Result<Vec<RunStats>, ScenarioError> {
        let phases = self.scenario.phases.clone();
        let mut stats = Vec::with_capacity(phases.len());
        for phase in &phases {
            stats.push(self.run_phase(phase)?);
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RigidBody3D;
    use crate::schema::{ComponentSet, RecordingConfig, TimelineConfig};
    use approx::assert_relative_eq;

    fn falling_body(interval: f64) -> Scenario {
        Scenario {
            timeline: TimelineConfig {
                recording: RecordingConfig::new(interval, 10.0).unwrap(),
                ..Default::default()
            },
            components: ComponentSet {
                rigid_body_3d: Some(RigidBody3D::default()),
                ..Default::default()
            },
            phases: Vec::new(),
            ..Default::default()
        }
    }

    fn play(time_scale: f32, duration: f32) -> Phase {
        Phase::Play {
            time_scale,
            duration,
        }
    }

    #[test]
    fn test_default_scenario_runs() {
        let mut runner = ScenarioRunner::new(Scenario::default()).unwrap();
        let stats = runner.run().unwrap();
        assert_eq!(stats.len(), 4);

        assert_relative_eq!(stats[0].time, 4.0, epsilon = 1e-3);
        assert_relative_eq!(stats[1].time, 2.0, epsilon = 1e-3);
        assert_eq!(stats[1].mode, PlaybackMode::Rewinding);
        assert_relative_eq!(stats[2].time, 3.0, epsilon = 1e-3);
        assert_relative_eq!(stats[3].time, 1.0, epsilon = 1e-9);
        assert_eq!(stats[3].mode, PlaybackMode::Paused);
        assert!(stats.iter().all(|s| s.failed_calls == 0));
        assert_eq!(stats[0].adapters, 3);
    }

    #[test]
    fn test_rewind_restores_recorded_position() {
        let mut runner = ScenarioRunner::new(falling_body(0.05)).unwrap();

        let at_two = runner.run_phase(&play(1.0, 2.0)).unwrap();
        let at_four = runner.run_phase(&play(1.0, 2.0)).unwrap();
        let at_two_y = at_two.position.unwrap().y;
        assert!(at_four.position.unwrap().y < at_two_y);

        let rewound = runner.run_phase(&Phase::RewindTo { time: at_two.time }).unwrap();
        assert_relative_eq!(rewound.position.unwrap().y, at_two_y, epsilon = 0.05);

        // Velocity resumes from the rewound state
        runner.run_phase(&play(1.0, 0.0)).unwrap();
        runner.frame();
        let body = runner.object().rigid_body_3d().unwrap();
        let velocity = body.read(|body| body.velocity).unwrap();
        assert_relative_eq!(velocity.y, -9.81 * 2.0, epsilon = 0.5);
    }

    #[test]
    fn test_slow_motion_covers_less_ground() {
        let mut normal = ScenarioRunner::new(falling_body(0.5)).unwrap();
        let mut slow = ScenarioRunner::new(falling_body(0.5)).unwrap();

        let normal = normal.run_phase(&play(1.0, 1.0)).unwrap();
        let slow = slow.run_phase(&play(0.5, 1.0)).unwrap();

        assert_relative_eq!(slow.time, 0.5, epsilon = 1e-3);
        let fall = |stats: &RunStats| -stats.position.unwrap().y;
        assert!(fall(&slow) < fall(&normal) * 0.5);
        assert!(fall(&slow) > 0.0);
    }

    #[test]
    fn test_global_clock_scales_timeline() {
        let mut scenario = falling_body(0.5);
        scenario.timeline.global_clock = Some("world".to_string());
        let mut runner = ScenarioRunner::new(scenario).unwrap();
        assert_eq!(runner.clocks().len(), 1);

        runner
            .run_phase(&Phase::SetGlobalTimeScale { time_scale: 0.5 })
            .unwrap();
        let stats = runner.run_phase(&play(1.0, 1.0)).unwrap();
        assert_relative_eq!(stats.time, 0.5, epsilon = 1e-3);

        runner
            .run_phase(&Phase::SetGlobalTimeScale { time_scale: 0.0 })
            .unwrap();
        let stats = runner.run_phase(&play(1.0, 1.0)).unwrap();
        assert_relative_eq!(stats.time, 0.5, epsilon = 1e-3);
        assert_eq!(stats.mode, PlaybackMode::Paused);
    }

    #[test]
    fn test_recording_phases() {
        let mut runner = ScenarioRunner::new(falling_body(0.5)).unwrap();
        let played = runner.run_phase(&play(1.0, 2.0)).unwrap();
        assert_eq!(played.snapshots, 4);

        let changed = runner
            .run_phase(&Phase::SetRecordingInterval { interval: 0.25 })
            .unwrap();
        assert_eq!(changed.snapshots, 0);
        assert_eq!(changed.memory_bytes, played.memory_bytes * 2);

        runner.run_phase(&play(1.0, 1.0)).unwrap();
        let before = runner.effector().positional_snapshot_count();
        assert!(before > 0);

        let longer = runner
            .run_phase(&Phase::SetRecordingDuration { duration: 20.0 })
            .unwrap();
        assert_eq!(longer.snapshots, before);
        assert_eq!(longer.memory_bytes, changed.memory_bytes * 2);

        let shorter = runner
            .run_phase(&Phase::SetRecordingDuration { duration: 0.5 })
            .unwrap();
        assert!(shorter.snapshots < before);
        assert!(shorter.snapshots > 0);

        let reset = runner.run_phase(&Phase::ResetRecordings).unwrap();
        assert_eq!(reset.snapshots, 0);
    }
}
