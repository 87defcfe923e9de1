//! Replay data structures shared by the loader and replay systems.

use bevy::prelude::*;

use crate::demo::{Equipment, SessionHeader, Team, Weapon};

use super::boundaries::BoundaryIndex;
use super::effects::{EffectInstance, EffectSchedule};
use super::state::PlaybackClock;
use super::timeline::Timeline;

/// Flash durations above this are drawn as "blinded".
pub const FLASHED_THRESHOLD: f32 = 0.8;

/// One playing participant in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub name: String,
    pub team: Team,
    pub hp: i32,
    pub position: Vec3,
    /// Where the player was last seen alive (current position while alive).
    pub last_alive_position: Vec3,
    /// Horizontal view angle in degrees.
    pub view_direction: f32,
    /// Total duration of the last flash, not the time remaining.
    pub flash_duration: f32,
    pub is_defusing: bool,
    /// Owned copy of the player's equipment at this frame.
    pub weapons: Vec<Equipment>,
}

impl PlayerState {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_flashed(&self) -> bool {
        self.flash_duration > FLASHED_THRESHOLD
    }

    pub fn carries_bomb(&self) -> bool {
        self.weapons.iter().any(|w| w.weapon == Weapon::Bomb)
    }
}

/// A grenade in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct GrenadeProjectile {
    pub weapon: Weapon,
    pub position: Vec3,
}

/// Convex hull of a burning area, in session coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfernoHull {
    pub points: Vec<Vec2>,
}

/// Bomb position, and who carries it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BombState {
    pub position: Vec3,
    pub carrier: Option<String>,
}

impl BombState {
    pub fn is_dropped(&self) -> bool {
        self.carrier.is_none()
    }
}

/// Score and clan name of one side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeamState {
    pub score: u32,
    pub clan_name: String,
}

/// Immutable game state for one timeline frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameSnapshot {
    /// In-game tick number.
    pub tick: i32,
    pub players: Vec<PlayerState>,
    pub grenades: Vec<GrenadeProjectile>,
    pub infernos: Vec<InfernoHull>,
    pub bomb: BombState,
    pub counter_terrorists: TeamState,
    pub terrorists: TeamState,
}

/// Counts gathered while loading a recording.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    pub frames: usize,
    pub skipped_frames: usize,
    pub events: usize,
    pub skipped_events: usize,
    pub flashes: usize,
    pub he_grenades: usize,
    pub smokes: usize,
}

/// Complete replay data built from a recording.
#[derive(Resource)]
pub struct ReplayData {
    /// Session metadata from the recording header.
    pub header: SessionHeader,
    /// Frame-rate derived timing.
    pub clock: PlaybackClock,
    /// One snapshot per decoded frame.
    pub timeline: Timeline,
    /// Round and half start frames.
    pub boundaries: BoundaryIndex,
    /// Grenade effects keyed by frame.
    pub effects: EffectSchedule,
    /// Load statistics.
    pub stats: LoadStats,
}

impl ReplayData {
    /// Snapshot for a frame, clamped to the timeline.
    pub fn snapshot(&self, frame: usize) -> Option<&FrameSnapshot> {
        let last = self.timeline.len().checked_sub(1)?;
        self.timeline.get(frame.min(last))
    }

    /// Effects rendered on a frame.
    pub fn effects_at(&self, frame: usize) -> &[EffectInstance] {
        self.effects.at(frame)
    }

    /// 1-based round number containing a frame.
    pub fn round_number(&self, frame: usize) -> usize {
        self.boundaries.round_number(frame)
    }
}
