//! Loader: runs the event and frame passes over a recording into ReplayData

use bevy::prelude::*;

use crate::demo::{DemoError, DemoSource, EffectKind};

use super::data::{LoadStats, ReplayData};
use super::effects::EffectDurations;
use super::event_index::build_event_index;
use super::state::PlaybackClock;
use super::timeline::build_timeline;

/// Build the complete replay from a recording.
///
/// The event pass runs first, then a fresh frame pass. A recording without a
/// single decodable frame cannot be replayed.
pub fn load_replay(source: &DemoSource) -> Result<ReplayData, DemoError> {
    let header = source.header().clone();
    info!(
        "Loading recording: map {}, {:.2} frames/s",
        header.map_name, header.frame_rate
    );

    let durations = EffectDurations::for_frame_rate(header.frame_rate);
    let index = build_event_index(source.events()?, durations);
    let timeline = build_timeline(source.frames()?);

    if timeline.is_empty() {
        return Err(DemoError::NoFrames);
    }

    let stats = LoadStats {
        frames: timeline.len(),
        skipped_frames: timeline.skipped(),
        events: index.events,
        skipped_events: index.skipped,
        flashes: index.effects.scheduled(EffectKind::Flash),
        he_grenades: index.effects.scheduled(EffectKind::He),
        smokes: index.effects.scheduled(EffectKind::Smoke),
    };

    info!(
        "Loaded {} frames ({} skipped), {} events ({} skipped), {} rounds, {} halves",
        stats.frames,
        stats.skipped_frames,
        stats.events,
        stats.skipped_events,
        index.boundaries.round_starts().len(),
        index.boundaries.half_starts().len()
    );

    Ok(ReplayData {
        clock: PlaybackClock::new(&header, timeline.len()),
        header,
        timeline,
        boundaries: index.boundaries,
        effects: index.effects,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = r#"
HD|64.0|de_mirage
MS
RS
FR|{"tick":100,"participants":[{"name":"a","team":"T","hp":100,"position":[0.0,0.0,0.0]}]}
FX|10.0,10.0,0.0|a
FR|{"tick":101}
FR|{"tick":
FR|{"tick":102}
RS
SK|5.0,5.0,0.0|_
FR|{"tick":103}
GH
SW
FR|{"tick":104}
WP
RS
HX|1.0,1.0,0.0|_
"#;

    #[test]
    fn test_load_replay() {
        let source = DemoSource::from_content(RECORDING).unwrap();
        let replay = load_replay(&source).unwrap();

        assert_eq!(replay.timeline.len(), 5);
        assert_eq!(replay.clock.frame_count, 5);
        assert_eq!(replay.stats.skipped_frames, 1);
        assert_eq!(replay.boundaries.round_starts(), &[0, 2]);
        assert_eq!(replay.boundaries.half_starts(), &[0, 3]);
        assert_eq!(replay.stats.flashes, 1);
        assert_eq!(replay.stats.smokes, 1);
        assert_eq!(replay.stats.he_grenades, 1);
        assert_eq!(replay.stats.events, 10);

        // Effects sit on the timeline index of the frame they followed
        assert_eq!(replay.effects_at(0).len(), 1);
        assert!(replay.effects_at(2).iter().any(|e| e.kind == EffectKind::Smoke));
        assert_eq!(replay.effects_at(2).len(), 2);
        assert_eq!(replay.snapshot(2).unwrap().tick, 102);
        assert_eq!(replay.round_number(3), 2);

        // Lookups past the end clamp to the last frame
        assert_eq!(replay.snapshot(99).unwrap().tick, 104);
    }

    #[test]
    fn test_no_frames_is_fatal() {
        let source = DemoSource::from_content("HD|64.0|de_mirage\nRS\nFR|{broken\n").unwrap();
        assert!(matches!(load_replay(&source), Err(DemoError::NoFrames)));
    }
}
