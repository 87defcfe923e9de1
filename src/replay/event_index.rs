//! Event stream processor: one pass over the recorded events

use bevy::prelude::*;

use crate::demo::{DomainEvent, EventKind, RecordError};

use super::boundaries::BoundaryIndex;
use super::effects::{EffectDurations, EffectSchedule};

/// Boundaries and effects collected from the event pass
#[derive(Debug, Clone)]
pub struct EventIndex {
    pub boundaries: BoundaryIndex,
    pub effects: EffectSchedule,
    /// Events applied
    pub events: usize,
    /// Events that failed to decode
    pub skipped: usize,
}

/// Consume the event pass once, in emission order.
///
/// Round and half markers stop being recorded after the match-end
/// announcement; grenade effects keep being scheduled.
pub fn build_event_index<I>(events: I, durations: EffectDurations) -> EventIndex
where
    I: IntoIterator<Item = Result<DomainEvent, RecordError>>,
{
    let mut index = EventIndex {
        boundaries: BoundaryIndex::default(),
        effects: EffectSchedule::new(durations),
        events: 0,
        skipped: 0,
    };
    let mut match_over = false;

    for event in events {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping event: {}", e);
                index.skipped += 1;
                continue;
            }
        };
        index.events += 1;

        if let Some((kind, detonation)) = event.kind.effect() {
            index.effects.schedule(kind, event.frame, detonation);
            continue;
        }

        if match_over && event.kind.is_structural() {
            debug!("Ignoring {} at frame {} after match end", event.kind.type_code(), event.frame);
            continue;
        }

        match event.kind {
            EventKind::RoundStart => {
                if !index.boundaries.push_round(event.frame) {
                    debug!("Round start at frame {} does not extend the round list", event.frame);
                }
            }
            EventKind::MatchStart | EventKind::HalfEnded | EventKind::SideSwitch => {
                if !index.boundaries.push_half(event.frame) {
                    debug!("Half start at frame {} does not extend the half list", event.frame);
                }
            }
            EventKind::MatchEnd => {
                debug!("Match ended at frame {}", event.frame);
                match_over = true;
            }
            _ => {}
        }
    }

    index
}
