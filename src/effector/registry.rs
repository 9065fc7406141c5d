//! Per-object adapter registry and frame dispatch.

use super::memory;
use super::positional::Positional;
use super::tracked::{Lifecycle, Stage, Tracked};
use crate::adapters::{
    AnimationAdapter, AnimatorAdapter, AudioSourceAdapter, NavMeshAgentAdapter, ParticleAdapter,
    Recordable, Tickable, WindZoneAdapter,
};
use crate::engine::{CapabilityKind, EngineObject};
use crate::schema::{ConfigError, RecordingConfig, TimelineConfig};
use crate::timeline::{Tick, Timeline};

/// Counters accumulated over an effector's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectorStats {
    pub adapters_constructed: u64,
    pub adapters_destroyed: u64,
    /// Adapter calls skipped because their component was gone or busy.
    pub failed_calls: u64,
}

/// Owns the timeline and every capability adapter of one tracked object.
///
/// Usage:
/// ```ignore
/// let mut effector = Effector::attach(&object, &TimelineConfig::default())?;
/// loop {
///     effector.fixed_update(FIXED_STEP);
///     effector.update(frame_delta);
/// }
/// ```
///
/// The adapter set only changes in [`reconcile`](Self::reconcile); updates
/// iterate a stable set. All pending `adjust_properties` calls run before any
/// pending `start`, and both before the adapter's first update.
#[derive(Debug)]
pub struct Effector {
    pub(super) timeline: Timeline,
    pub(super) positional: Positional,
    pub(super) animator: Option<Tracked<AnimatorAdapter>>,
    pub(super) animation: Option<Tracked<AnimationAdapter>>,
    /// First entry is the primary source.
    pub(super) audio_sources: Vec<Tracked<AudioSourceAdapter>>,
    pub(super) particle_system: Option<Tracked<ParticleAdapter>>,
    pub(super) nav_mesh_agent: Option<Tracked<NavMeshAgentAdapter>>,
    pub(super) wind_zone: Option<Tracked<WindZoneAdapter>>,
    pub(super) stats: EffectorStats,
    running: bool,
}

impl Effector {
    /// Create an effector with no adapters.
    pub fn new(config: &TimelineConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_timeline(Timeline::new(config)?))
    }

    pub fn with_timeline(timeline: Timeline) -> Self {
        Self {
            timeline,
            positional: Positional::None,
            animator: None,
            animation: None,
            audio_sources: Vec::new(),
            particle_system: None,
            nav_mesh_agent: None,
            wind_zone: None,
            stats: EffectorStats::default(),
            running: false,
        }
    }

    /// Create an effector and build adapters for the object's components.
    pub fn attach(object: &impl EngineObject, config: &TimelineConfig) -> Result<Self, ConfigError> {
        let mut effector = Self::new(config)?;
        effector.reconcile(object);
        Ok(effector)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn stats(&self) -> EffectorStats {
        self.stats
    }

    /// Check if any update has run yet.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn positional(&self) -> &Positional {
        &self.positional
    }

    pub fn animator(&self) -> Option<&AnimatorAdapter> {
        self.animator.as_ref().map(Tracked::adapter)
    }

    pub fn animation(&self) -> Option<&AnimationAdapter> {
        self.animation.as_ref().map(Tracked::adapter)
    }

    /// The primary audio source adapter.
    pub fn audio_source(&self) -> Option<&AudioSourceAdapter> {
        self.audio_sources.first().map(Tracked::adapter)
    }

    pub fn audio_sources(&self) -> impl Iterator<Item = &AudioSourceAdapter> {
        self.audio_sources.iter().map(Tracked::adapter)
    }

    pub fn particle_system(&self) -> Option<&ParticleAdapter> {
        self.particle_system.as_ref().map(Tracked::adapter)
    }

    pub fn nav_mesh_agent(&self) -> Option<&NavMeshAgentAdapter> {
        self.nav_mesh_agent.as_ref().map(Tracked::adapter)
    }

    pub fn wind_zone(&self) -> Option<&WindZoneAdapter> {
        self.wind_zone.as_ref().map(Tracked::adapter)
    }

    /// Number of live adapters.
    pub fn adapter_count(&self) -> usize {
        usize::from(!self.positional.is_none())
            + usize::from(self.animator.is_some())
            + usize::from(self.animation.is_some())
            + self.audio_sources.len()
            + usize::from(self.particle_system.is_some())
            + usize::from(self.nav_mesh_agent.is_some())
            + usize::from(self.wind_zone.is_some())
    }

    /// Kinds of every live adapter, audio sources repeated per instance.
    pub fn active_kinds(&self) -> Vec<CapabilityKind> {
        let mut kinds: Vec<CapabilityKind> = self.positional.kind().into_iter().collect();
        kinds.extend(self.animator().map(Tickable::kind));
        kinds.extend(self.animation().map(Tickable::kind));
        kinds.extend(self.audio_sources().map(Tickable::kind));
        kinds.extend(self.particle_system().map(Tickable::kind));
        kinds.extend(self.nav_mesh_agent().map(Tickable::kind));
        kinds.extend(self.wind_zone().map(Tickable::kind));
        kinds
    }

    /// Every adapter in start order: positional first, then dependents.
    fn lifecycles_mut(&mut self) -> Vec<&mut dyn Lifecycle> {
        let mut slots: Vec<&mut dyn Lifecycle> = Vec::with_capacity(8);
        if let Some(slot) = self.positional.lifecycle_mut() {
            slots.push(slot);
        }
        if let Some(slot) = self.animator.as_mut() {
            slots.push(slot);
        }
        if let Some(slot) = self.animation.as_mut() {
            slots.push(slot);
        }
        for slot in self.audio_sources.iter_mut() {
            slots.push(slot);
        }
        if let Some(slot) = self.particle_system.as_mut() {
            slots.push(slot);
        }
        if let Some(slot) = self.nav_mesh_agent.as_mut() {
            slots.push(slot);
        }
        if let Some(slot) = self.wind_zone.as_mut() {
            slots.push(slot);
        }
        slots
    }

    /// Positional and clip recorders, the ones holding snapshot history.
    fn recordables_mut(&mut self) -> Vec<&mut dyn Recordable> {
        let mut recordables: Vec<&mut dyn Recordable> = Vec::with_capacity(3);
        if let Some(recordable) = self.positional.recordable_mut() {
            recordables.push(recordable);
        }
        if let Some(tracked) = self.animator.as_mut() {
            recordables.push(tracked.adapter_mut());
        }
        if let Some(tracked) = self.animation.as_mut() {
            recordables.push(tracked.adapter_mut());
        }
        recordables
    }

    /// Run `adjust_properties` then `start` for adapters that have not had them.
    fn run_pending_lifecycle(&mut self, tick: &Tick) {
        let mut failures = 0;
        let mut slots = self.lifecycles_mut();

        for slot in slots.iter_mut() {
            if slot.stage() == Stage::Constructed {
                match slot.tickable().adjust_properties() {
                    Ok(()) => slot.set_stage(Stage::Adjusted),
                    Err(err) => {
                        log::debug!("Deferring adapter setup: {}", err);
                        failures += 1;
                    }
                }
            }
        }
        for slot in slots.iter_mut() {
            if slot.stage() == Stage::Adjusted {
                match slot.tickable().start(tick) {
                    Ok(()) => slot.set_stage(Stage::Started),
                    Err(err) => {
                        log::debug!("Deferring adapter start: {}", err);
                        failures += 1;
                    }
                }
            }
        }

        self.stats.failed_calls += failures;
    }

    /// Dispatch `call` to every started adapter; failures skip that adapter only.
    fn dispatch(
        &mut self,
        tick: &Tick,
        call: fn(&mut dyn Tickable, &Tick) -> Result<(), crate::adapters::AdapterError>,
    ) {
        let mut failures = 0;
        for slot in self.lifecycles_mut() {
            if slot.stage() != Stage::Started {
                continue;
            }
            let adapter = slot.tickable();
            if let Err(err) = call(adapter, tick) {
                log::debug!("Skipping {} tick: {}", adapter.kind(), err);
                failures += 1;
            }
        }
        self.stats.failed_calls += failures;
    }

    /// Advance the timeline by `delta` real seconds and update every adapter.
    pub fn update(&mut self, delta: f32) -> Tick {
        let tick = self.timeline.advance(delta);
        self.run_pending_lifecycle(&tick);
        self.dispatch(&tick, |adapter, tick| adapter.update(tick));
        self.running = true;
        tick
    }

    /// Run one physics step of `fixed_delta` real seconds.
    pub fn fixed_update(&mut self, fixed_delta: f32) -> Tick {
        let tick = self.timeline.fixed_tick(fixed_delta);
        self.run_pending_lifecycle(&tick);
        self.dispatch(&tick, |adapter, tick| adapter.fixed_update(tick));
        self.running = true;
        tick
    }

    /// Set the local time scale: 1 normal, 0 paused, negative rewinds.
    pub fn set_time_scale(&mut self, time_scale: f32) -> Result<(), ConfigError> {
        self.timeline.set_time_scale(time_scale)
    }

    /// Jump to a past time, hold there, and apply the recorded state.
    ///
    /// Returns the time actually reached after clamping to retained history.
    /// History is not modified; playing forward from here re-records the future.
    pub fn rewind_to(&mut self, target: f64) -> f64 {
        let reached = self.timeline.rewind_to(target);
        self.update(0.0);
        reached
    }

    /// Replace the recording configuration.
    ///
    /// Applies to the positional and clip recorders. An interval or
    /// rewindable change resets them; a duration change keeps their history
    /// and only trims it when the window shrinks. The particle adapter
    /// variant is not re-evaluated.
    pub fn set_recording_config(&mut self, config: RecordingConfig) -> Result<(), ConfigError> {
        self.timeline.set_recording_config(config)?;
        let mut reset = 0;
        for recordable in self.recordables_mut() {
            if recordable.reconfigure(config) {
                reset += 1;
            }
        }
        if reset > 0 {
            log::info!(
                "Recording configuration changed (interval {}s, duration {}s); reset {} recorders",
                config.recording_interval,
                config.recording_duration,
                reset
            );
        }
        Ok(())
    }

    /// Change the capture interval, discarding recorded history.
    pub fn set_recording_interval(&mut self, interval: f64) -> Result<(), ConfigError> {
        let config = RecordingConfig {
            recording_interval: interval,
            ..*self.timeline.recording_config()
        };
        self.set_recording_config(config)
    }

    /// Change the retained history length. Recorded history is kept; a
    /// shorter window evicts the oldest snapshots.
    pub fn set_recording_duration(&mut self, duration: f64) -> Result<(), ConfigError> {
        let config = RecordingConfig {
            recording_duration: duration,
            ..*self.timeline.recording_config()
        };
        self.set_recording_config(config)
    }

    /// Enable or disable history retention.
    pub fn set_rewindable(&mut self, rewindable: bool) {
        let config = RecordingConfig {
            rewindable,
            ..*self.timeline.recording_config()
        };
        // Only the flag changes; the stored config is already valid
        if let Err(err) = self.set_recording_config(config) {
            log::warn!("Could not change rewindable flag: {}", err);
        }
    }

    /// Discard all recorded history (positional and clip) and start
    /// recording afresh.
    pub fn reset_recordings(&mut self) {
        for recordable in self.recordables_mut() {
            recordable.reset();
        }
        log::debug!("Recordings reset at {:.3}s", self.timeline.time());
    }

    /// Estimated bytes of positional history for this object.
    ///
    /// Zero without a positional adapter or when not rewindable. Before the
    /// first update the figure is computed from configuration alone.
    pub fn estimate_memory_usage(&self) -> usize {
        let config = self.timeline.recording_config();
        if !config.rewindable {
            return 0;
        }
        if self.running {
            self.positional
                .recordable()
                .map_or(0, Recordable::estimate_memory_usage)
        } else {
            self.positional
                .kind()
                .map_or(0, |kind| memory::estimate_memory_usage(config, kind))
        }
    }

    /// Snapshots currently held by the positional recorder.
    pub fn positional_snapshot_count(&self) -> usize {
        self.positional
            .recordable()
            .map_or(0, Recordable::snapshot_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        Animator, AudioSource, ParticleSystem, RigidBody2D, RigidBody3D, SceneObject, Transform,
        WindZone,
    };
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn config(interval: f64, duration: f64) -> TimelineConfig {
        TimelineConfig {
            recording: RecordingConfig::new(interval, duration).unwrap(),
            ..Default::default()
        }
    }

    fn positional_stage(effector: &Effector) -> Option<Stage> {
        match effector.positional() {
            Positional::None => None,
            Positional::Motion3D(tracked) => Some(tracked.stage()),
            Positional::Motion2D(tracked) => Some(tracked.stage()),
            Positional::Transform(tracked) => Some(tracked.stage()),
        }
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut object = SceneObject::new("crate");
        let _transform = object.insert_transform(Transform::default());
        let _wind = object.insert_wind_zone(WindZone::default());
        object.add_audio_source(AudioSource::default());

        let mut effector = Effector::new(&TimelineConfig::default()).unwrap();
        let first = effector.reconcile(&object);
        assert_eq!(first.constructed.len(), 3);
        assert!(first.destroyed.is_empty());

        let second = effector.reconcile(&object);
        assert!(second.is_unchanged());
        assert_eq!(effector.adapter_count(), 3);
        assert_eq!(effector.stats().adapters_constructed, 3);
    }

    #[test]
    fn test_positional_is_exclusive_and_prioritised() {
        let mut object = SceneObject::new("ball");
        let _transform = object.insert_transform(Transform::default());
        let _body = object.insert_rigid_body_3d(RigidBody3D::default());

        let mut effector = Effector::attach(&object, &TimelineConfig::default()).unwrap();
        assert_eq!(effector.positional().kind(), Some(CapabilityKind::Motion3D));
        assert_eq!(effector.active_kinds(), vec![CapabilityKind::Motion3D]);

        object.remove_rigid_body_3d();
        let report = effector.reconcile(&object);
        assert_eq!(report.destroyed, vec![CapabilityKind::Motion3D]);
        assert_eq!(report.constructed, vec![CapabilityKind::Transform]);
        assert_eq!(effector.positional().kind(), Some(CapabilityKind::Transform));

        object.remove_transform();
        effector.reconcile(&object);
        assert!(effector.positional().is_none());
        assert_eq!(effector.adapter_count(), 0);
    }

    #[test]
    fn test_replaced_body_gets_gravity_back() {
        let mut object = SceneObject::new("crate");
        let body_2d = object.insert_rigid_body_2d(RigidBody2D {
            velocity: glam::Vec2::new(1.0, 0.0),
            ..Default::default()
        });
        let mut effector = Effector::attach(&object, &TimelineConfig::default()).unwrap();
        effector.update(0.1);
        effector.set_time_scale(0.0).unwrap();
        effector.update(0.1);
        {
            let body = body_2d.borrow();
            assert_eq!(body.gravity_scale, 0.0);
            assert!(body.is_kinematic);
        }

        let _body_3d = object.insert_rigid_body_3d(RigidBody3D::default());
        let report = effector.reconcile(&object);
        assert_eq!(report.destroyed, vec![CapabilityKind::Motion2D]);
        assert_eq!(effector.positional().kind(), Some(CapabilityKind::Motion3D));

        let body = body_2d.borrow();
        assert_eq!(body.gravity_scale, 1.0);
        assert!(!body.is_kinematic);
        assert_relative_eq!(body.velocity.x, 1.0);
    }

    #[test]
    fn test_removed_audio_source_is_restored() {
        let mut object = SceneObject::new("speaker");
        let (id, source) = object.add_audio_source(AudioSource {
            pitch: 2.0,
            ..Default::default()
        });
        let mut effector = Effector::attach(&object, &TimelineConfig::default()).unwrap();
        effector.set_time_scale(0.0).unwrap();
        effector.update(0.1);
        assert!(!source.borrow().is_playing);

        // Host drops the source from the object but keeps it alive
        object.remove_audio_source(id);
        effector.reconcile(&object);
        let source = source.borrow();
        assert!(source.is_playing);
        assert_eq!(source.pitch, 2.0);
    }

    #[test]
    fn test_audio_sources_follow_set_difference() {
        let mut object = SceneObject::new("speaker");
        let (first, _a) = object.add_audio_source(AudioSource::default());
        let (second, _b) = object.add_audio_source(AudioSource::default());

        let mut effector = Effector::attach(&object, &TimelineConfig::default()).unwrap();
        assert_eq!(effector.audio_source().map(Tickable::component_id), Some(first));

        object.remove_audio_source(first);
        let (third, _c) = object.add_audio_source(AudioSource::default());
        let report = effector.reconcile(&object);
        assert_eq!(report.destroyed, vec![CapabilityKind::AudioSource]);
        assert_eq!(report.constructed, vec![CapabilityKind::AudioSource]);

        let ids: Vec<_> = effector.audio_sources().map(Tickable::component_id).collect();
        assert_eq!(ids, vec![second, third]);
        assert_eq!(effector.audio_source().map(Tickable::component_id), Some(second));
    }

    #[test]
    fn test_lifecycle_runs_before_first_update() {
        let mut object = SceneObject::new("ball");
        let body = object.insert_rigid_body_3d(RigidBody3D::default());
        assert!(body.borrow().use_gravity);

        let mut effector = Effector::attach(&object, &TimelineConfig::default()).unwrap();
        assert_eq!(positional_stage(&effector), Some(Stage::Constructed));
        assert!(!effector.is_running());

        effector.update(0.1);
        assert_eq!(positional_stage(&effector), Some(Stage::Started));
        // Gravity was taken over during adjust_properties
        assert!(!body.borrow().use_gravity);
        assert_eq!(effector.positional_snapshot_count(), 1);

        // Late additions start on the next tick
        let _wind = object.insert_wind_zone(WindZone::default());
        effector.reconcile(&object);
        assert_eq!(effector.wind_zone.as_ref().map(Tracked::stage), Some(Stage::Constructed));
        effector.update(0.1);
        assert_eq!(effector.wind_zone.as_ref().map(Tracked::stage), Some(Stage::Started));
    }

    #[test]
    fn test_stale_component_is_skipped() {
        let mut object = SceneObject::new("crate");
        let transform = object.insert_transform(Transform::default());
        let wind = object.insert_wind_zone(WindZone::default());

        let mut effector = Effector::attach(&object, &TimelineConfig::default()).unwrap();
        effector.update(0.5);
        let base_main = wind.borrow().main;

        object.remove_transform();
        drop(transform);
        effector.set_time_scale(0.5).unwrap();
        effector.update(1.0);

        assert_eq!(effector.stats().failed_calls, 1);
        assert_relative_eq!(wind.borrow().main, base_main * 0.5);

        let report = effector.reconcile(&object);
        assert_eq!(report.destroyed, vec![CapabilityKind::Transform]);
        effector.update(1.0);
        assert_eq!(effector.stats().failed_calls, 1);
    }

    #[test]
    fn test_busy_component_is_skipped() {
        let mut object = SceneObject::new("crate");
        let transform = object.insert_transform(Transform::default());
        let mut effector = Effector::attach(&object, &TimelineConfig::default()).unwrap();
        effector.update(0.5);

        let guard = transform.borrow_mut();
        effector.update(0.5);
        drop(guard);

        assert_eq!(effector.stats().failed_calls, 1);
        assert_eq!(effector.positional_snapshot_count(), 1);
    }

    #[test]
    fn test_rewind_samples_between_snapshots() {
        let mut object = SceneObject::new("crate");
        let transform = object.insert_transform(Transform::default());
        let mut effector = Effector::attach(&object, &config(0.5, 2.0)).unwrap();

        for step in 1..=6 {
            let time = step as f32 * 0.5;
            transform.borrow_mut().position = Vec3::new(time, 0.0, 0.0);
            effector.update(0.5);
        }
        // 1.0 is exactly two seconds old and retained
        assert_eq!(effector.positional_snapshot_count(), 5);
        assert_relative_eq!(effector.timeline().rewind_floor(), 1.0);

        let reached = effector.rewind_to(2.25);
        assert_relative_eq!(reached, 2.25);
        assert_relative_eq!(transform.borrow().position.x, 2.25, epsilon = 1e-5);

        // Clamped to the oldest retained snapshot
        assert_relative_eq!(effector.rewind_to(0.0), 1.0);
        assert_relative_eq!(transform.borrow().position.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_resume_re_records_future() {
        let mut object = SceneObject::new("crate");
        let transform = object.insert_transform(Transform::default());
        let mut effector = Effector::attach(&object, &config(0.5, 2.0)).unwrap();

        for step in 1..=6 {
            transform.borrow_mut().position = Vec3::splat(step as f32 * 0.5);
            effector.update(0.5);
        }
        effector.rewind_to(2.25);
        effector.set_time_scale(1.0).unwrap();
        effector.update(0.5);

        let Positional::Transform(tracked) = effector.positional() else {
            panic!("expected transform adapter");
        };
        let timestamps: Vec<f64> = tracked
            .adapter()
            .recorder()
            .history()
            .map(|s| s.timestamp())
            .collect();
        assert_eq!(timestamps, vec![1.0, 1.5, 2.0, 2.75]);
        assert_relative_eq!(effector.timeline().live_time(), 2.75);
    }

    #[test]
    fn test_interval_change_resets_history() {
        let mut object = SceneObject::new("crate");
        let _transform = object.insert_transform(Transform::default());
        let mut effector = Effector::attach(&object, &config(0.5, 2.0)).unwrap();
        for _ in 0..4 {
            effector.update(0.5);
        }
        assert_eq!(effector.positional_snapshot_count(), 4);

        effector.set_recording_interval(0.1).unwrap();
        assert_eq!(effector.positional_snapshot_count(), 0);
        effector.update(0.5);
        assert_eq!(effector.positional_snapshot_count(), 1);

        assert_eq!(
            effector.set_recording_interval(0.0),
            Err(ConfigError::InvalidRecordingInterval(0.0))
        );
        assert_eq!(effector.timeline().recording_config().recording_interval, 0.1);
    }

    #[test]
    fn test_duration_change_keeps_history() {
        let mut object = SceneObject::new("crate");
        let _transform = object.insert_transform(Transform::default());
        let mut effector = Effector::attach(&object, &config(0.5, 2.0)).unwrap();
        for _ in 0..4 {
            effector.update(0.5);
        }
        assert_eq!(effector.positional_snapshot_count(), 4);

        effector.set_recording_duration(4.0).unwrap();
        assert_eq!(effector.positional_snapshot_count(), 4);
        assert_relative_eq!(effector.timeline().rewind_floor(), 0.0);

        // Shrinking trims to the newest second
        effector.set_recording_duration(1.0).unwrap();
        assert_eq!(effector.positional_snapshot_count(), 3);
        assert_relative_eq!(effector.timeline().rewind_floor(), 1.0);
        assert_relative_eq!(effector.rewind_to(0.0), 1.0);
    }

    #[test]
    fn test_reset_recordings_clears_positional_and_clip_history() {
        let mut object = SceneObject::new("hero");
        let _transform = object.insert_transform(Transform::default());
        let _animator = object.insert_animator(Animator::default());
        let mut effector = Effector::attach(&object, &config(0.5, 2.0)).unwrap();
        effector.update(0.5);
        effector.update(0.5);

        let clip_snapshots = |effector: &Effector| {
            effector
                .animator()
                .map_or(0, |adapter| adapter.recorder().len())
        };
        assert_eq!(effector.positional_snapshot_count(), 2);
        assert_eq!(clip_snapshots(&effector), 2);

        effector.reset_recordings();
        assert_eq!(effector.positional_snapshot_count(), 0);
        assert_eq!(clip_snapshots(&effector), 0);

        // Clip recorders follow interval changes too
        effector.update(0.5);
        effector.set_recording_interval(0.25).unwrap();
        assert_eq!(clip_snapshots(&effector), 0);
    }

    #[test]
    fn test_memory_estimate_matches_before_and_after_start() {
        let mut object = SceneObject::new("ball");
        let _body = object.insert_rigid_body_3d(RigidBody3D::default());
        let config = config(0.5, 2.0);

        let mut effector = Effector::attach(&object, &config).unwrap();
        let design_time = effector.estimate_memory_usage();
        assert_eq!(
            design_time,
            memory::estimate_object_memory_usage(&object, &config.recording)
        );
        assert!(design_time > 0);

        effector.update(0.1);
        assert_eq!(effector.estimate_memory_usage(), design_time);

        effector.set_recording_duration(4.0).unwrap();
        assert_eq!(effector.estimate_memory_usage(), design_time * 2);
        assert_eq!(effector.positional_snapshot_count(), 1);

        effector.set_rewindable(false);
        assert_eq!(effector.estimate_memory_usage(), 0);
    }

    #[test]
    fn test_memory_estimate_without_positional_is_zero() {
        let mut object = SceneObject::new("speaker");
        object.add_audio_source(AudioSource::default());
        let effector = Effector::attach(&object, &TimelineConfig::default()).unwrap();
        assert_eq!(effector.estimate_memory_usage(), 0);
    }

    #[test]
    fn test_particle_variant_is_fixed_at_construction() {
        let mut object = SceneObject::new("sparks");
        let _particles = object.insert_particle_system(ParticleSystem::default());
        let mut effector = Effector::attach(&object, &TimelineConfig::default()).unwrap();
        assert_eq!(effector.particle_system().map(ParticleAdapter::is_rewindable), Some(true));

        effector.set_rewindable(false);
        effector.reconcile(&object);
        assert_eq!(effector.particle_system().map(ParticleAdapter::is_rewindable), Some(true));

        object.remove_particle_system();
        effector.reconcile(&object);
        let _particles = object.insert_particle_system(ParticleSystem::default());
        effector.reconcile(&object);
        assert_eq!(effector.particle_system().map(ParticleAdapter::is_rewindable), Some(false));
    }
}
