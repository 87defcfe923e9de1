//! Recording inspector - loads a recording headlessly and prints what the viewer would see
//!
//! Usage:
//!   cargo run --bin inspect -- match.dlog
//!   cargo run --bin inspect -- match.dlog --events

use std::process::ExitCode;

use demoview::demo::{DemoSource, EffectKind};
use demoview::logging::init_logging;
use demoview::replay::{BoundaryKind, ReplayData, clock_time, load_replay};

fn print_markers(replay: &ReplayData, kind: BoundaryKind, label: &str) {
    let markers = replay.boundaries.markers(kind);
    println!("{} starts ({}):", label, markers.len());
    for (i, &frame) in markers.iter().enumerate() {
        println!(
            "  {:>3}  frame {:>7}  {}",
            i + 1,
            frame,
            clock_time(replay.clock.seconds_at(frame))
        );
    }
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: inspect <recording.dlog> [--events]");
        return ExitCode::FAILURE;
    };
    let list_events = args.iter().skip(2).any(|a| a == "--events");

    let source = match DemoSource::open(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to open '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let replay = match load_replay(&source) {
        Ok(replay) => replay,
        Err(e) => {
            eprintln!("Failed to load '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let stats = &replay.stats;
    println!("=== {} ===", path);
    println!("Map:        {}", replay.header.map_name);
    println!(
        "Frame rate: {:.3} ({} rounded)",
        replay.header.frame_rate, replay.clock.frame_rate_rounded
    );
    println!(
        "Frames:     {} ({} skipped), {}",
        stats.frames,
        stats.skipped_frames,
        clock_time(replay.clock.seconds_at(replay.clock.last_index()))
    );
    println!("Events:     {} ({} skipped)", stats.events, stats.skipped_events);
    println!(
        "Effects:    {} frame instances",
        replay.effects.instance_count()
    );

    let durations = replay.effects.durations();
    for kind in EffectKind::ALL {
        println!(
            "  {:<6} {:>5} scheduled, {:>5} frames each",
            kind.label(),
            replay.effects.scheduled(kind),
            durations.of(kind)
        );
    }
    println!();

    print_markers(&replay, BoundaryKind::Round, "Round");
    print_markers(&replay, BoundaryKind::Half, "Half");

    if list_events {
        println!();
        println!("Events:");
        let events = match source.events() {
            Ok(events) => events,
            Err(e) => {
                eprintln!("Failed to reread '{}': {}", path, e);
                return ExitCode::FAILURE;
            }
        };
        for event in events.flatten() {
            println!(
                "  frame {:>7}  {}  {:?}",
                event.frame,
                event.kind.type_code(),
                event.kind
            );
        }
    }

    if let Some(last) = replay.snapshot(replay.clock.last_index()) {
        println!();
        println!(
            "Final score: CT {} - {} T",
            last.counter_terrorists.score, last.terrorists.score
        );
    }

    ExitCode::SUCCESS
}
