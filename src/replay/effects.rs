//! Effect scheduler: expands a grenade detonation into per-frame instances

use std::collections::HashMap;

use bevy::prelude::*;

use crate::constants::{FLASH_EFFECT_FRAMES, HE_EFFECT_FRAMES, SMOKE_EFFECT_SECS};
use crate::demo::{EffectKind, GrenadeDetonation};

/// How many frames each effect kind stays on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectDurations {
    pub flash: usize,
    pub he: usize,
    pub smoke: usize,
}

impl EffectDurations {
    /// Flash and HE are fixed frame counts; smoke lasts 18 seconds, truncated
    pub fn for_frame_rate(frame_rate: f64) -> Self {
        Self {
            flash: FLASH_EFFECT_FRAMES,
            he: HE_EFFECT_FRAMES,
            smoke: (SMOKE_EFFECT_SECS * frame_rate).max(0.0) as usize,
        }
    }

    pub fn of(&self, kind: EffectKind) -> usize {
        match kind {
            EffectKind::Flash => self.flash,
            EffectKind::He => self.he,
            EffectKind::Smoke => self.smoke,
        }
    }
}

/// One frame's worth of a decaying effect
#[derive(Debug, Clone, PartialEq)]
pub struct EffectInstance {
    pub kind: EffectKind,
    pub detonation: GrenadeDetonation,
    /// Frame the grenade went off on
    pub origin_frame: usize,
    /// Frame this instance is drawn on
    pub frame: usize,
    /// 0 on the origin frame, `duration - 1` on the last
    pub lifetime: usize,
    pub duration: usize,
}

impl EffectInstance {
    pub fn position(&self) -> Vec3 {
        let (x, y, z) = self.detonation.position;
        Vec3::new(x, y, z)
    }

    /// Share of the effect's life already spent, in `[0, 1)`
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            return 1.0;
        }
        self.lifetime as f32 / self.duration as f32
    }

    /// Frames left after this one
    pub fn remaining(&self) -> usize {
        self.duration.saturating_sub(self.lifetime + 1)
    }
}

/// Sparse frame -> effects mapping, immutable once the event pass finishes
#[derive(Debug, Clone)]
pub struct EffectSchedule {
    durations: EffectDurations,
    by_frame: HashMap<usize, Vec<EffectInstance>>,
    scheduled: HashMap<EffectKind, usize>,
}

impl EffectSchedule {
    pub fn new(durations: EffectDurations) -> Self {
        Self {
            durations,
            by_frame: HashMap::new(),
            scheduled: HashMap::new(),
        }
    }

    /// Add one instance per frame of the effect's life, starting at `origin_frame`.
    /// Overlapping effects share the frame's bag.
    pub fn schedule(&mut self, kind: EffectKind, origin_frame: usize, detonation: &GrenadeDetonation) {
        let duration = self.durations.of(kind);

        for lifetime in 0..duration {
            let frame = origin_frame + lifetime;
            self.by_frame.entry(frame).or_default().push(EffectInstance {
                kind,
                detonation: detonation.clone(),
                origin_frame,
                frame,
                lifetime,
                duration,
            });
        }

        *self.scheduled.entry(kind).or_insert(0) += 1;
    }

    /// Effects drawn on a frame; frames past the timeline simply have none
    pub fn at(&self, frame: usize) -> &[EffectInstance] {
        self.by_frame.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of detonations scheduled for a kind
    pub fn scheduled(&self, kind: EffectKind) -> usize {
        self.scheduled.get(&kind).copied().unwrap_or(0)
    }

    /// Total number of instances across all frames
    pub fn instance_count(&self) -> usize {
        self.by_frame.values().map(Vec::len).sum()
    }

    pub fn durations(&self) -> EffectDurations {
        self.durations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detonation(x: f32) -> GrenadeDetonation {
        GrenadeDetonation {
            position: (x, 0.0, 0.0),
            thrower: None,
        }
    }

    #[test]
    fn test_durations() {
        let d = EffectDurations::for_frame_rate(64.0);
        assert_eq!(d.of(EffectKind::Flash), 10);
        assert_eq!(d.of(EffectKind::He), 10);
        assert_eq!(d.of(EffectKind::Smoke), 1152);

        // 18 * 20.5 = 369
        assert_eq!(EffectDurations::for_frame_rate(20.5).smoke, 369);
        // 18 * 31.99 = 575.82, truncated
        assert_eq!(EffectDurations::for_frame_rate(31.99).smoke, 575);
    }

    #[test]
    fn test_smoke_expands_over_eighteen_seconds() {
        let mut schedule = EffectSchedule::new(EffectDurations::for_frame_rate(64.0));
        schedule.schedule(EffectKind::Smoke, 100, &detonation(1.0));

        assert_eq!(schedule.instance_count(), 1152);
        assert!(schedule.at(99).is_empty());
        assert!(schedule.at(100 + 1152).is_empty());

        for frame in 100..100 + 1152 {
            let bag = schedule.at(frame);
            assert_eq!(bag.len(), 1);
            assert_eq!(bag[0].lifetime, frame - 100);
            assert_eq!(bag[0].origin_frame, 100);
        }
        assert_eq!(schedule.at(100 + 1151)[0].remaining(), 0);
    }

    #[test]
    fn test_overlapping_effects_share_frames() {
        let mut schedule = EffectSchedule::new(EffectDurations::for_frame_rate(64.0));
        schedule.schedule(EffectKind::Flash, 5, &detonation(1.0));
        schedule.schedule(EffectKind::He, 8, &detonation(2.0));
        schedule.schedule(EffectKind::Flash, 8, &detonation(3.0));

        assert_eq!(schedule.at(5).len(), 1);
        assert_eq!(schedule.at(9).len(), 3);
        assert_eq!(schedule.at(14).len(), 3);
        assert_eq!(schedule.at(15).len(), 2);
        assert_eq!(schedule.at(17).len(), 2);
        assert!(schedule.at(18).is_empty());

        assert_eq!(schedule.scheduled(EffectKind::Flash), 2);
        assert_eq!(schedule.scheduled(EffectKind::He), 1);
        assert_eq!(schedule.scheduled(EffectKind::Smoke), 0);
    }

    #[test]
    fn test_lookup_is_repeatable() {
        let mut schedule = EffectSchedule::new(EffectDurations::for_frame_rate(32.0));
        schedule.schedule(EffectKind::He, 0, &detonation(4.0));

        let first = schedule.at(3).to_vec();
        let second = schedule.at(3).to_vec();
        assert_eq!(first, second);
        assert!((first[0].progress() - 0.3).abs() < 1e-6);
    }
}
