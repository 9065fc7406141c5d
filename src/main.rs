//! Temporal Rewind CLI - Run rewind scenarios from JSON files.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use temporal_rewind::{
    runner::{RunStats, ScenarioRunner},
    schema::{Phase, Scenario},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.json>", args[0]);
        eprintln!();
        eprintln!("Record and rewind a simulated object following a scripted scenario.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  scenario.json  Path to scenario file");
        eprintln!();
        eprintln!("Example scenario is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_scenario();
        return;
    }

    let scenario_path = PathBuf::from(&args[1]);
    let scenario = Scenario::load(&scenario_path).unwrap_or_else(|e| {
        eprintln!("Error loading scenario: {}", e);
        std::process::exit(1);
    });

    let recording = scenario.timeline.recording;
    println!("Temporal Rewind Scenario");
    println!("========================");
    println!("Object: {}", scenario.name);
    println!(
        "Recording: every {}s for {}s (rewindable: {})",
        recording.recording_interval, recording.recording_duration, recording.rewindable
    );
    println!(
        "Frame: {:.4}s, physics step: {:.4}s",
        scenario.frame_delta, scenario.fixed_delta
    );
    println!("Phases: {}", scenario.phases.len());
    println!();

    let phases = scenario.phases.clone();
    let mut runner = ScenarioRunner::new(scenario).unwrap_or_else(|e| {
        eprintln!("Error starting scenario: {}", e);
        std::process::exit(1);
    });

    println!("Adapters: {:?}", runner.effector().active_kinds());
    println!(
        "Estimated history memory: {} bytes",
        runner.effector().estimate_memory_usage()
    );
    println!();

    println!("Running scenario...");
    let start = Instant::now();

    for (i, phase) in phases.iter().enumerate() {
        let stats = runner.run_phase(phase).unwrap_or_else(|e| {
            eprintln!("Error in phase {}: {}", i + 1, e);
            std::process::exit(1);
        });
        println!("  Phase {}/{}: {}", i + 1, phases.len(), describe(phase));
        print_stats(&stats);
    }

    let elapsed = start.elapsed();
    let final_stats = RunStats::from_runner(&runner);
    let effector_stats = runner.effector().stats();

    println!();
    println!("Final state:");
    print_stats(&final_stats);
    println!(
        "  Adapters constructed/destroyed: {}/{}",
        effector_stats.adapters_constructed, effector_stats.adapters_destroyed
    );
    println!(
        "Time: {:.3}s ({:.0} frames/s)",
        elapsed.as_secs_f32(),
        final_stats.frames as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
    );
}

fn describe(phase: &Phase) -> String {
    match phase {
        Phase::Play {
            time_scale,
            duration,
        } => format!("play {}s at x{}", duration, time_scale),
        Phase::RewindTo { time } => format!("rewind to {}s", time),
        Phase::SetRecordingInterval { interval } => format!("recording interval {}s", interval),
        Phase::SetRecordingDuration { duration } => format!("recording duration {}s", duration),
        Phase::ResetRecordings => "reset recordings".to_string(),
        Phase::SetGlobalTimeScale { time_scale } => format!("global clock x{}", time_scale),
    }
}

fn print_stats(stats: &RunStats) {
    println!(
        "    time={:.3}s live={:.3}s mode={} snapshots={} memory={}B failed={}",
        stats.time,
        stats.live_time,
        stats.mode,
        stats.snapshots,
        stats.memory_bytes,
        stats.failed_calls
    );
    if let Some(position) = stats.position {
        println!(
            "    position=({:.3}, {:.3}, {:.3})",
            position.x, position.y, position.z
        );
    }
}

fn print_example_scenario() {
    let scenario = Scenario::default();

    println!("Example scenario (scenario.json):");
    match serde_json::to_string_pretty(&scenario) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing scenario: {}", e),
    }
}
